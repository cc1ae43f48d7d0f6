use anyhow::{anyhow, bail, Context};
use clap::Parser;
use hospital_finder::{
    sdk::config::FinderConfig,
    sdk::hospitals::{Hospital, HospitalDirectory},
    sdk::routing::Coord,
    sdk::session::FinderSession,
    sdk::specialties::SpecialtyCatalog,
    sdk::util::log::init_logging,
};
use serde::Serialize;
use std::{fs::File, io::Write, path::PathBuf, sync::Arc};

/// Find hospitals for a medical specialty, sorted by driving time from an address
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Starting address (e.g., "Banegårdspladsen 1, 8000 Aarhus")
    #[arg(short, long, required_unless_present = "list_specialties")]
    address: Option<String>,

    /// Specialty to filter on (e.g., "Kardiologi"); all hospitals if omitted
    #[arg(short, long)]
    specialty: Option<String>,

    /// Which address suggestion to use, counted from 0
    #[arg(long, default_value_t = 0)]
    pick: usize,

    /// Also fetch the driving route to the closest hospital
    #[arg(long)]
    route: bool,

    /// Write the result JSON to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the known specialties and exit
    #[arg(long)]
    list_specialties: bool,
}

#[derive(Serialize)]
struct RouteReport {
    hospital_id: String,
    points: usize,
    distance: f64,
    duration: f64,
    coordinates: Vec<Coord>,
}

#[derive(Serialize)]
struct Report {
    origin: Option<Coord>,
    origin_label: Option<String>,
    specialty: String,
    hospitals: Vec<Hospital>,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<RouteReport>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let config = FinderConfig::from_env().context("Invalid configuration")?;

    let catalog = SpecialtyCatalog::new(&config.specialties_path).with_context(|| {
        format!("Failed to load specialties from {}", config.specialties_path.display())
    })?;

    if cli.list_specialties {
        for name in catalog.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let directory = HospitalDirectory::load(&config.hospitals_path).with_context(|| {
        format!("Failed to load hospitals from {}", config.hospitals_path.display())
    })?;
    for label in directory.specialties_in_use() {
        if !catalog.contains(&label) {
            log::warn!("Specialty {:?} is used by hospitals but not in the catalog", label);
        }
    }
    log::info!(
        "Loaded {} hospitals and {} specialties",
        directory.len(),
        catalog.names().len()
    );

    let specialty = match cli.specialty.as_deref() {
        Some(wanted) => catalog
            .find(wanted)
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow!(
                    "Unknown specialty {:?}. Known: {}",
                    wanted,
                    catalog.names().join(", ")
                )
            })?,
        None => String::new(),
    };

    let mut session = FinderSession::from_config(&config, Arc::new(directory))?;

    // --- Resolve the origin ---
    let address = cli.address.unwrap_or_default();
    let candidates = session.search_address(&address).await;
    if candidates.is_empty() {
        bail!("No address suggestions for {:?}", address);
    }
    for (i, candidate) in candidates.iter().enumerate() {
        log::info!("[{}] {}", i, candidate.text);
    }
    session
        .select_candidate(cli.pick)
        .await
        .ok_or_else(|| anyhow!("There is no suggestion #{}", cli.pick))?;

    // --- Filter and rank ---
    session.set_specialty(&specialty).await;
    let hospitals = session.displayed();
    if hospitals.iter().any(|h| h.estimated) {
        log::warn!("Some travel times are estimates, the routing service did not answer");
    }

    let route = match (cli.route, hospitals.first()) {
        (true, Some(closest)) => session
            .hover_hospital(Some(&closest.id))
            .await
            .map(|geometry| RouteReport {
                hospital_id: closest.id.clone(),
                points: geometry.coordinates.len(),
                distance: geometry.distance,
                duration: geometry.duration,
                coordinates: geometry.coordinates.clone(),
            }),
        _ => None,
    };
    if cli.route && route.is_none() {
        log::warn!("No route could be drawn to the closest hospital");
    }

    let state = session.state();
    let report = Report {
        origin: state.origin,
        origin_label: state.origin_label.clone(),
        specialty,
        hospitals,
        route,
    };

    let json_output = serde_json::to_string_pretty(&report)?;
    match cli.output {
        Some(path) => {
            let mut file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            file.write_all(json_output.as_bytes())?;
            log::info!("Results written to {}", path.display());
        }
        None => println!("{}", json_output),
    }

    Ok(())
}
