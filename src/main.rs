use anyhow::Result;
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use prizewheel::animation::{self, SpinAnimation};
use prizewheel::config::WheelConfig;
use prizewheel::tick::LogTicks;
use prizewheel::{SpinRequest, SpinSession};

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(why) = run().await {
        error!("wheel error: {why:?}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = WheelConfig::from_env()?;
    debug!("config: {}", serde_json::to_string(&config)?);
    let segments = config.load_segments().await?;
    info!("wheel ready with {} segments", segments.len());

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = SpinSession::new(segments, config.planner(), rng, LogTicks);

    let plan = match session.request_spin()? {
        SpinRequest::Started(plan) => plan,
        SpinRequest::Ignored => {
            println!("Nothing to spin.");
            return Ok(());
        }
    };

    let spin = SpinAnimation::tween(plan.from, plan.target, config.spin_duration());
    animation::drive(spin, config.frame_interval(), |rotation| {
        session.on_frame(rotation);
    })
    .await;

    match session.on_animation_complete() {
        Some(winner) => {
            info!("winner: {}", serde_json::to_string(&winner)?);
            println!("{} wins! (segment {})", winner.label, winner.index);
        }
        None => println!("The wheel stopped without a winner."),
    }
    session.dismiss_winner();
    Ok(())
}
