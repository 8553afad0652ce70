use std::{collections::BTreeSet, sync::Arc};

use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::pack::PackSource;
use crate::point::Point;
use crate::query::{cull, filter, histogram, sample, Criteria, Histogram, Viewport};
use crate::session::{LoadError, ShardCache, ShardLoader};

/// Where the current selection's shard stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No city selected.
    #[default]
    Idle,
    Loading,
    Ready,
    /// The last load failed; selecting the city again retries it.
    Failed(LoadError),
}

/// A load requested by `Session::select_city`. Hand the fetch result back
/// through `Session::finish_load`; tickets from superseded selections are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    city_id: String,
}

impl LoadTicket {
    #[inline] pub fn city_id(&self) -> &str { &self.city_id }
}

/// Outcome of a selection change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Points are available now (cache hit, or no city selected).
    Ready,
    /// The shard must be fetched.
    Pending(LoadTicket),
}

/// Query state for one map session: selection, viewport, filters and the shard cache.
pub struct Session<S> {
    loader: Arc<ShardLoader<S>>,
    cache: ShardCache,
    config: SessionConfig,
    selected: Option<String>,
    generation: u64,
    state: LoadState,
    points: Arc<[Point]>,
    viewport: Option<Viewport>,
    criteria: Criteria,
}

impl<S: PackSource> Session<S> {
    pub fn new(loader: ShardLoader<S>, config: SessionConfig) -> Self {
        Self {
            loader: Arc::new(loader),
            cache: ShardCache::new(),
            config,
            selected: None,
            generation: 0,
            state: LoadState::Idle,
            points: Arc::from(Vec::new()),
            viewport: None,
            criteria: Criteria::default(),
        }
    }

    /// Shared handle for fetching off the session's thread.
    pub fn loader(&self) -> Arc<ShardLoader<S>> { Arc::clone(&self.loader) }

    #[inline] pub fn config(&self) -> &SessionConfig { &self.config }
    #[inline] pub fn selected(&self) -> Option<&str> { self.selected.as_deref() }
    #[inline] pub fn state(&self) -> &LoadState { &self.state }
    #[inline] pub fn viewport(&self) -> Option<&Viewport> { self.viewport.as_ref() }
    #[inline] pub fn criteria(&self) -> &Criteria { &self.criteria }
    #[inline] pub fn cache(&self) -> &ShardCache { &self.cache }

    /// Points of the current selection; empty while loading or after a failure.
    #[inline] pub fn points(&self) -> &[Point] { &self.points }

    /// Change the selected city. Any load still in flight becomes stale.
    pub fn select_city(&mut self, city_id: Option<&str>) -> Selection {
        self.generation += 1;
        self.selected = city_id.map(str::to_string);

        let Some(city_id) = city_id else {
            self.points = Arc::from(Vec::new());
            self.state = LoadState::Idle;
            return Selection::Ready;
        };

        if let Some(points) = self.cache.get(city_id) {
            debug!(city = city_id, points = points.len(), "[session] cache hit");
            self.points = points;
            self.state = LoadState::Ready;
            return Selection::Ready;
        }

        self.points = Arc::from(Vec::new());
        self.state = LoadState::Loading;
        Selection::Pending(LoadTicket { generation: self.generation, city_id: city_id.to_string() })
    }

    /// Re-request the current selection, e.g. after `LoadState::Failed`.
    pub fn retry(&mut self) -> Selection {
        let selected = self.selected.clone();
        self.select_city(selected.as_deref())
    }

    /// Apply a completed load. Returns false (and drops the result) if the ticket is stale.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<Point>, LoadError>) -> bool {
        if ticket.generation != self.generation {
            debug!(city = ticket.city_id.as_str(), "[session] discarding superseded load");
            return false;
        }

        match result {
            Ok(points) => {
                self.points = self.cache.insert(&ticket.city_id, points);
                self.state = LoadState::Ready;
            }
            Err(e) => {
                warn!("[session] {e}");
                self.state = LoadState::Failed(e);
            }
        }
        true
    }

    /// Select `city_id` and load it on the calling thread.
    pub fn load_city(&mut self, city_id: Option<&str>) -> Result<Arc<[Point]>, LoadError> {
        if let Selection::Pending(ticket) = self.select_city(city_id) {
            let result = self.loader.fetch(ticket.city_id());
            self.finish_load(ticket, result);
        }
        match &self.state {
            LoadState::Failed(e) => Err(e.clone()),
            _ => Ok(Arc::clone(&self.points)),
        }
    }

    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.viewport = viewport;
    }

    pub fn set_filters(&mut self, criteria: Criteria) {
        self.criteria = criteria;
    }

    /// Points to draw: filtered, culled to the viewport, then downsampled.
    pub fn visible_points(&self) -> Vec<&Point> {
        let filtered = filter(self.points.iter(), &self.criteria);
        let culled = cull(filtered, self.viewport.as_ref());
        sample(&culled, self.config.max_points).into_owned()
    }

    /// Score distribution of the visible area, ignoring the score-bin filter.
    pub fn histogram(&self) -> Histogram {
        let filtered = filter(self.points.iter(), &self.criteria.without_score_bin());
        histogram(cull(filtered, self.viewport.as_ref()))
    }

    /// Distinct categories of the loaded shard, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.points.iter()
            .map(|p| p.category.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        set.into_iter().collect()
    }
}
