use serde::{Deserialize, Serialize};

use crate::point::{IncomeGroup, Point};
use crate::query::ScoreBin;

/// Share above which an income group is the majority of a place's visitors.
const MAJORITY_SHARE: f64 = 0.5;

/// Filter selection. Every field is optional; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Criteria {
    pub category: Option<String>,
    pub score_bin: Option<ScoreBin>,
    pub income_majority: Option<IncomeGroup>,
}

/// One active test of a `Criteria`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate<'a> {
    Category(&'a str),
    ScoreBin(ScoreBin),
    IncomeMajority(IncomeGroup),
}

impl Predicate<'_> {
    pub fn test(&self, point: &Point) -> bool {
        match *self {
            Predicate::Category(label) => point.category == label,
            Predicate::ScoreBin(bin) => bin.contains(point.score),
            Predicate::IncomeMajority(group) => {
                point.income_share(group).is_some_and(|share| share > MAJORITY_SHARE)
            }
        }
    }
}

impl Criteria {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.score_bin.is_none() && self.income_majority.is_none()
    }

    /// Active predicates in evaluation order.
    pub fn predicates(&self) -> Vec<Predicate<'_>> {
        let mut out = Vec::with_capacity(3);
        if let Some(label) = self.category.as_deref() { out.push(Predicate::Category(label)) }
        if let Some(bin) = self.score_bin { out.push(Predicate::ScoreBin(bin)) }
        if let Some(group) = self.income_majority { out.push(Predicate::IncomeMajority(group)) }
        out
    }

    pub fn matches(&self, point: &Point) -> bool {
        self.predicates().iter().all(|p| p.test(point))
    }

    /// The same selection with the score bin cleared (what the histogram counts over).
    pub fn without_score_bin(&self) -> Criteria {
        Criteria { score_bin: None, ..self.clone() }
    }
}

/// Points satisfying every active predicate, in input order.
pub fn filter<'a, I>(points: I, criteria: &Criteria) -> Vec<&'a Point>
where
    I: IntoIterator<Item = &'a Point>,
{
    let predicates = criteria.predicates();
    points.into_iter()
        .filter(|point| predicates.iter().all(|p| p.test(point)))
        .collect()
}
