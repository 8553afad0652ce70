use anyhow::{anyhow, Result};
use mixatlas::{
    color_of, CityIndex, Criteria, DiskPack, PackSource, ScoreBin, Session, SessionConfig,
    ShardLoader, Viewport,
};
use serde_json::json;

use crate::cli::QueryArgs;

pub fn run(_cli: &crate::cli::Cli, args: &QueryArgs) -> Result<()> {
    if args.pack.starts_with("http://") || args.pack.starts_with("https://") {
        #[cfg(feature = "download")]
        return query(mixatlas::HttpPack::new(args.pack.as_str())?, args);

        #[cfg(not(feature = "download"))]
        anyhow::bail!("[query] built without the download feature; cannot read {}", args.pack);
    }
    query(DiskPack::new(&args.pack), args)
}

fn query<S: PackSource>(source: S, args: &QueryArgs) -> Result<()> {
    let index = CityIndex::read_from_pack(&source)?;

    let city = match (&args.city, args.at) {
        (Some(id), _) => Some(index.get(id).ok_or_else(|| anyhow!("[query] unknown city id: {id}"))?),
        (None, Some([lng, lat])) => Some(
            index.city_at(lng, lat)
                .ok_or_else(|| anyhow!("[query] no city contains {lng},{lat}"))?,
        ),
        (None, None) => None,
    };
    if let Some(city) = city {
        eprintln!("[query] selected {} ({})", city.name, city.id);
    }

    let mut config = SessionConfig::default();
    if let Some(max_points) = args.max_points { config.max_points = max_points }

    let mut session = Session::new(ShardLoader::with_manifest(source)?, config);
    session.load_city(city.map(|c| c.id.as_str()))?;

    let [west, south, east, north] = args.bbox.unwrap_or([-180.0, -90.0, 180.0, 90.0]);
    session.set_viewport(Some(Viewport::new(west, south, east, north)));
    session.set_filters(Criteria {
        category: args.category.clone(),
        score_bin: args.bin.and_then(|b| ScoreBin::new(b as usize)),
        income_majority: args.income,
    });

    let visible = session.visible_points();
    let mut out = json!({
        "city": city.map(|c| c.id.as_str()),
        "loaded": session.points().len(),
        "visible": visible.len(),
        "categories": session.categories(),
        "histogram": session.histogram().bins,
    });
    if args.points {
        out["points"] = visible.iter()
            .map(|p| json!({ "id": p.id, "position": p.position, "score": p.score, "color": color_of(p.score).to_string() }))
            .collect();
    }

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
