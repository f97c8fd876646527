//! Per-vehicle-class metal composition fractions.
//!
//! Industry-average weight composition for automotive scrap. Steel covers
//! frame, body panels and engine block; aluminum covers wheels, engine parts
//! and modern body panels; copper covers wiring, radiators and motors; lead
//! is mostly the 12V battery. The trace platinum/palladium/rhodium fractions
//! are catalytic-converter content.

use super::entities::{MetalComposition, Resolved};

/// Class used whenever a lookup finds nothing better.
pub const DEFAULT_VEHICLE_CLASS: &str = "Midsize Cars";

const SPORTS_CAR: MetalComposition = MetalComposition {
    steel: 0.50,
    aluminum: 0.15,
    copper: 0.02,
    stainless_steel: 0.03,
    brass: 0.005,
    lead: 0.015,
    platinum: 0.000003,
    palladium: 0.000002,
    rhodium: 0.0000005,
};

const MINICOMPACT_CAR: MetalComposition = MetalComposition {
    steel: 0.55,
    aluminum: 0.08,
    copper: 0.02,
    stainless_steel: 0.025,
    brass: 0.004,
    lead: 0.015,
    platinum: 0.000002,
    palladium: 0.0000015,
    rhodium: 0.0000003,
};

const STANDARD_CAR: MetalComposition = MetalComposition {
    steel: 0.55,
    aluminum: 0.10,
    copper: 0.02,
    stainless_steel: 0.025,
    brass: 0.004,
    lead: 0.015,
    platinum: 0.000002,
    palladium: 0.0000015,
    rhodium: 0.0000003,
};

const LARGE_CAR: MetalComposition = MetalComposition {
    steel: 0.57,
    ..STANDARD_CAR
};

const SMALL_PICKUP: MetalComposition = MetalComposition {
    steel: 0.60,
    aluminum: 0.08,
    copper: 0.03,
    stainless_steel: 0.03,
    brass: 0.005,
    lead: 0.015,
    platinum: 0.000003,
    palladium: 0.000002,
    rhodium: 0.0000004,
};

// Standard pickups carry the largest catalytic converters.
const STANDARD_PICKUP: MetalComposition = MetalComposition {
    steel: 0.60,
    aluminum: 0.10,
    copper: 0.03,
    stainless_steel: 0.03,
    brass: 0.005,
    lead: 0.015,
    platinum: 0.000004,
    palladium: 0.0000025,
    rhodium: 0.0000005,
};

const VAN: MetalComposition = MetalComposition {
    steel: 0.60,
    aluminum: 0.08,
    copper: 0.03,
    stainless_steel: 0.025,
    brass: 0.005,
    lead: 0.015,
    platinum: 0.000003,
    palladium: 0.000002,
    rhodium: 0.0000004,
};

const MINIVAN: MetalComposition = MetalComposition {
    steel: 0.58,
    aluminum: 0.10,
    copper: 0.03,
    stainless_steel: 0.025,
    brass: 0.004,
    lead: 0.015,
    platinum: 0.000002,
    palladium: 0.0000015,
    rhodium: 0.0000003,
};

const SMALL_SUV: MetalComposition = MetalComposition {
    steel: 0.55,
    aluminum: 0.12,
    copper: 0.03,
    stainless_steel: 0.03,
    brass: 0.005,
    lead: 0.015,
    platinum: 0.000003,
    palladium: 0.000002,
    rhodium: 0.0000004,
};

const STANDARD_SUV: MetalComposition = MetalComposition {
    steel: 0.58,
    ..SMALL_SUV
};

const SPECIAL_PURPOSE: MetalComposition = MetalComposition {
    steel: 0.62,
    aluminum: 0.08,
    copper: 0.03,
    stainless_steel: 0.025,
    brass: 0.005,
    lead: 0.015,
    platinum: 0.000002,
    palladium: 0.0000015,
    rhodium: 0.0000003,
};

fn lookup(vehicle_class: &str) -> Option<MetalComposition> {
    // Class labels come straight from the EPA dataset, inconsistent spellings
    // included.
    let composition = match vehicle_class {
        "Two Seaters" => SPORTS_CAR,
        "Minicompact Cars" => MINICOMPACT_CAR,
        "Subcompact Cars" | "Compact Cars" | "Midsize Cars" => STANDARD_CAR,
        "Small Station Wagons" | "Midsize Station Wagons" => STANDARD_CAR,
        "Large Cars" | "Midsize-Large Station Wagons" => LARGE_CAR,
        "Small Pickup Trucks" | "Small Pickup Trucks 2WD" | "Small Pickup Trucks 4WD" => {
            SMALL_PICKUP
        }
        "Standard Pickup Trucks"
        | "Standard Pickup Trucks 2WD"
        | "Standard Pickup Trucks 4WD"
        | "Standard Pickup Trucks/2wd" => STANDARD_PICKUP,
        "Vans" | "Vans Passenger" | "Vans, Passenger Type" | "Vans, Cargo Type" => VAN,
        "Minivan - 2WD" | "Minivan - 4WD" => MINIVAN,
        "Small Sport Utility Vehicle 2WD" | "Small Sport Utility Vehicle 4WD" => SMALL_SUV,
        "Sport Utility Vehicle - 2WD"
        | "Sport Utility Vehicle - 4WD"
        | "Standard Sport Utility Vehicle 2WD"
        | "Standard Sport Utility Vehicle 4WD" => STANDARD_SUV,
        "Special Purpose Vehicle"
        | "Special Purpose Vehicle 2WD"
        | "Special Purpose Vehicle 4WD"
        | "Special Purpose Vehicles"
        | "Special Purpose Vehicles/2wd"
        | "Special Purpose Vehicles/4wd" => SPECIAL_PURPOSE,
        _ => return None,
    };
    Some(composition)
}

/// Composition for a vehicle class, defaulting to "Midsize Cars" for
/// unknown labels. Never fails.
pub fn composition_for(vehicle_class: &str) -> Resolved<MetalComposition> {
    match lookup(vehicle_class) {
        Some(composition) => Resolved::exact(composition),
        None => Resolved::defaulted(STANDARD_CAR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Metal;

    #[test]
    fn known_class_resolves_exactly() {
        let resolved = composition_for("Standard Pickup Trucks 4WD");
        assert!(!resolved.is_defaulted());
        assert_eq!(resolved.value.steel, 0.60);
        assert_eq!(resolved.value.platinum, 0.000004);
    }

    #[test]
    fn unknown_class_falls_back_to_midsize() {
        let resolved = composition_for("Hovercraft");
        assert!(resolved.is_defaulted());
        assert_eq!(resolved.value, composition_for("Midsize Cars").value);
    }

    #[test]
    fn fractions_are_sane_for_every_metal() {
        let classes = [
            "Two Seaters",
            "Compact Cars",
            "Large Cars",
            "Standard Pickup Trucks",
            "Vans, Cargo Type",
            "Minivan - 2WD",
            "Sport Utility Vehicle - 4WD",
            "Special Purpose Vehicles/4wd",
        ];
        for class in classes {
            let composition = composition_for(class).value;
            for metal in Metal::ALL {
                let fraction = composition.fraction(metal);
                assert!(fraction >= 0.0 && fraction < 1.0, "{class} {metal:?}");
                if metal.is_precious() {
                    assert!(fraction < 0.0001, "{class} {metal:?} should be trace");
                }
            }
        }
    }
}
