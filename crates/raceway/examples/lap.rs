//! Generate a track and print the minimum-move lap.
//!
//! Usage:
//!   cargo run -p raceway --example lap -- [seed]

use raceway::prelude::*;

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let cfg = TrackCfg::default().with_seed(seed);
    let track = match Track::generate(&cfg) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("seed {seed}: {e}");
            return;
        }
    };
    println!(
        "seed {seed}: {} skeleton points, {} wall segments",
        track.points.len(),
        track.boundary.walls.len()
    );
    match track.solve(&SearchCfg::default()) {
        Ok(sol) => {
            println!("lap in {} moves ({} states explored)", sol.moves(), sol.explored);
            for (k, s) in sol.path.iter().enumerate() {
                println!(
                    "{k:3}: p=({:6.1}, {:6.1}) v=({:5.1}, {:5.1})",
                    s.position.x, s.position.y, s.velocity.x, s.velocity.y
                );
            }
        }
        Err(e) => println!("{e}"),
    }
}
