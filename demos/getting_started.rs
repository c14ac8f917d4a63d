use parkade::{Parkade, ParkadeError, Point, SpotCategory};
use std::time::{Duration, SystemTime};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Parkade - Getting Started ===\n");

    let engine = Parkade::new();
    println!("✓ Created in-memory engine\n");

    // === 1. REGISTER LOTS AND SPOTS ===
    println!("1. Lots and Spots");
    println!("-----------------");

    let central = engine.create_lot("Connaught Place", Point::new(77.2090, 28.6139))?;
    let annex = engine.create_lot("Khan Market", Point::new(77.2273, 28.6003))?;
    println!("   Registered lots: {}", engine.list_lots().len());

    let car_spot = engine.create_spot(central.id, "A-12", SpotCategory::Car)?;
    engine.create_spot(central.id, "A-13", SpotCategory::Bike)?;
    engine.create_spot(annex.id, "K-01", SpotCategory::Ev)?;
    println!(
        "   Spots in {}: {}\n",
        central.name,
        engine.list_spots(central.id)?.len()
    );

    // === 2. RESERVE A SPOT ===
    println!("2. Reservations");
    println!("---------------");

    let noon = SystemTime::now();
    let two_pm = noon + Duration::from_secs(2 * 3600);
    let reservation = engine.reserve(car_spot.id, noon, two_pm, "DL8CAF1234")?;
    println!("   Reserved {} for DL8CAF1234", car_spot.number);

    // Overlapping claims are rejected, naming the blocker.
    let overlap = engine.reserve(car_spot.id, noon + Duration::from_secs(3600), two_pm, "X");
    match overlap {
        Err(ParkadeError::Conflict { existing, .. }) => {
            println!("   Overlap rejected, blocked by {}\n", existing)
        }
        other => println!("   Unexpected outcome: {:?}\n", other),
    }

    // === 3. SEARCH NEARBY ===
    println!("3. Availability Search");
    println!("----------------------");

    // From India Gate, while the car spot is occupied.
    let india_gate = Point::new(77.2295, 28.6129);
    let now_hits = engine.search_available(&india_gate, 5_000.0, None)?;
    println!("   Available within 5km right now: {}", now_hits.len());
    for hit in &now_hits {
        println!("     - {} at {:.0}m", hit.spot.number, hit.distance_m);
    }

    // The same search after the reservation lapses includes A-12 again.
    let later_hits = engine.search_available_at(&india_gate, 5_000.0, None, two_pm)?;
    println!("   Available within 5km at two o'clock: {}\n", later_hits.len());

    // === 4. END AND RELEASE ===
    println!("4. Ending Reservations");
    println!("----------------------");

    engine.end_reservation(reservation.id)?;
    println!("   Ended {}", reservation.id);
    println!(
        "   {} available again: {}\n",
        car_spot.number,
        engine.is_spot_available(car_spot.id)?
    );

    // === 5. CLEANUP CASCADE ===
    println!("5. Deleting a Lot");
    println!("-----------------");

    engine.delete_lot(annex.id)?;
    let stats = engine.stats();
    println!(
        "   After deletion: {} lots, {} spots, {} reservations on file",
        stats.lot_count, stats.spot_count, stats.reservation_count
    );

    println!("\n=== Done ===");
    Ok(())
}
