use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};

use consult_recorder::{
    AudioFrame, BackendClient, CaptureController, ChannelBackend, Config, NoRuntimePermissions,
    RecordingSession, SessionOutcome,
};

/// Record one consultation and upload it to the hospital backend
#[derive(Parser)]
#[command(name = "consult-recorder")]
struct Args {
    /// Config file path (config-crate style, extension optional)
    #[arg(short, long, default_value = "config/consult-recorder")]
    config: String,

    /// Hospital-issued consent code
    #[arg(long)]
    code: String,

    /// Seconds of audio to capture before stopping
    #[arg(long, default_value_t = 5)]
    duration_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v0.1.0", cfg.service.name);
    info!("Backend: {}", cfg.api.base_url);

    let client = BackendClient::new(&cfg.api)?;

    // No platform microphone here; feed the channel backend with silence so
    // a full consent -> capture -> upload cycle can run end to end against a
    // live backend. Embedders inject their own CaptureBackend instead.
    let (frame_tx, frame_rx) = mpsc::channel(64);
    let backend = ChannelBackend::new(frame_rx);
    let mut stop_rx = backend.stop_watch();

    let sample_rate = cfg.audio.sample_rate;
    let channels = cfg.audio.channels;
    tokio::spawn(async move {
        let samples_per_frame = (sample_rate / 10) as usize * channels as usize;
        let mut timestamp_ms = 0u64;
        let mut ticker = tokio::time::interval(Duration::from_millis(100));

        loop {
            tokio::select! {
                _ = stop_rx.changed() => break,
                _ = ticker.tick() => {
                    let frame = AudioFrame {
                        samples: vec![0i16; samples_per_frame],
                        sample_rate,
                        channels,
                        timestamp_ms,
                    };
                    if frame_tx.send(frame).await.is_err() {
                        break;
                    }
                    timestamp_ms += 100;
                }
            }
        }
    });

    let capture = CaptureController::new(Box::new(backend), cfg.capture_config());
    let mut session = RecordingSession::new(
        Box::new(NoRuntimePermissions),
        Box::new(client.clone()),
        Box::new(client),
        capture,
    );

    session.press().await?;

    match session.submit_code(&args.code).await {
        Ok(SessionOutcome::RecordingStarted { hospital_name }) => {
            info!("Recording at {} for {}s", hospital_name, args.duration_secs);
        }
        Ok(other) => {
            error!("Unexpected session outcome: {:?}", other);
            return Ok(());
        }
        Err(e) => {
            error!("{}", e);
            return Ok(());
        }
    }

    tokio::time::sleep(Duration::from_secs(args.duration_secs)).await;

    match session.press().await {
        Ok(SessionOutcome::Uploaded(upload)) => {
            info!(
                "Uploaded: recording {} ({})",
                upload.recording_id, upload.status
            );
            if let Some(transcript) = upload.transcript {
                info!("Transcript: {}", transcript);
            }
        }
        Ok(other) => error!("Unexpected session outcome: {:?}", other),
        Err(e) => error!("{}", e),
    }

    session.acknowledge();
    Ok(())
}
