use std::sync::OnceLock;

use rust_embed::RustEmbed;

use crate::domain::resolver::VehicleDatabase;

/// Embed the entire `assets/` directory into the binary.
#[derive(RustEmbed)]
#[folder = "assets"]
struct EmbeddedAssets;

static VEHICLE_DATABASE: OnceLock<VehicleDatabase> = OnceLock::new();

/// Returns the bundled EPA-derived vehicle database, parsed once.
pub fn vehicle_database() -> &'static VehicleDatabase {
    VEHICLE_DATABASE.get_or_init(|| {
        let raw = load_asset("vehicles.json");
        serde_json::from_slice(&raw)
            .unwrap_or_else(|err| panic!("Embedded asset vehicles.json is malformed: {err}"))
    })
}

fn load_asset(path: &str) -> Vec<u8> {
    EmbeddedAssets::get(path)
        .map(|file| file.data.into_owned())
        .unwrap_or_else(|| panic!("Failed to locate embedded asset: {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_database_parses_and_has_entries() {
        let db = vehicle_database();
        assert!(!db.is_empty());
        let ford = db.get("FORD").expect("FORD present");
        assert!(ford.contains_key("F150 PICKUP 2WD"));
    }
}
