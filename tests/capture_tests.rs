// Integration tests for the capture side: frames in, a finalized WAV
// artifact out, with the microphone released on every exit path.

use anyhow::Result;
use tempfile::TempDir;
use tokio::sync::mpsc;

use consult_recorder::{
    AudioFrame, CaptureArtifact, CaptureBackend, CaptureConfig, CaptureController, CaptureError,
    ChannelBackend, WavRecorder,
};

fn frame(index: u64, samples: usize) -> AudioFrame {
    AudioFrame {
        samples: vec![250i16; samples],
        sample_rate: 16000,
        channels: 1,
        timestamp_ms: index * 100,
    }
}

#[tokio::test]
async fn recorder_writes_one_wav_artifact() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = CaptureConfig::new(temp_dir.path().to_path_buf());

    let recorder = WavRecorder::create(&config)?;
    let (tx, rx) = mpsc::channel(100);

    let record_handle = tokio::spawn(recorder.record(rx));

    // One second of 16kHz mono in 100ms frames.
    for i in 0..10 {
        tx.send(frame(i, 1600)).await?;
    }
    drop(tx);

    let artifact = record_handle.await??;
    assert_eq!(artifact.sample_count, 16000);
    assert_eq!(artifact.sample_rate, 16000);
    assert_eq!(artifact.channels, 1);
    assert!((artifact.duration_seconds - 1.0).abs() < 1e-6);
    assert!(artifact.path.exists());
    assert!(std::fs::metadata(&artifact.path)?.len() > 0);

    // The file on disk must agree with what the recorder reported.
    let reopened = CaptureArtifact::open(&artifact.path)?;
    assert_eq!(reopened.sample_count, artifact.sample_count);
    assert_eq!(reopened.sample_rate, artifact.sample_rate);
    Ok(())
}

#[tokio::test]
async fn recorder_rejects_an_empty_capture() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = CaptureConfig::new(temp_dir.path().to_path_buf());

    let recorder = WavRecorder::create(&config)?;
    let (tx, rx) = mpsc::channel::<AudioFrame>(1);
    drop(tx);

    let result = recorder.record(rx).await;
    assert!(matches!(result, Err(CaptureError::EmptyCapture)));
    Ok(())
}

#[tokio::test]
async fn controller_runs_a_start_stop_cycle() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = CaptureConfig::new(temp_dir.path().to_path_buf());

    let (tx, rx) = mpsc::channel(100);
    let backend = ChannelBackend::new(rx);
    let mut stop_rx = backend.stop_watch();

    let mut controller = CaptureController::new(Box::new(backend), config);
    assert!(!controller.is_capturing());

    controller.start().await?;
    assert!(controller.is_capturing());

    // Producer task: a fixed burst of frames, then hold the sender open
    // until the backend signals stop, as a live microphone source would.
    let producer = tokio::spawn(async move {
        for i in 0..5u64 {
            if tx.send(frame(i, 160)).await.is_err() {
                return;
            }
        }
        let _ = stop_rx.changed().await;
        drop(tx);
    });

    let artifact = controller.stop().await?;
    producer.await?;

    assert!(!controller.is_capturing());
    assert!(artifact.sample_count > 0);
    assert!(artifact.path.exists());
    Ok(())
}

#[tokio::test]
async fn controller_stop_without_start_is_an_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = CaptureConfig::new(temp_dir.path().to_path_buf());

    let (_tx, rx) = mpsc::channel::<AudioFrame>(1);
    let mut controller = CaptureController::new(Box::new(ChannelBackend::new(rx)), config);

    let result = controller.stop().await;
    assert!(matches!(result, Err(CaptureError::NotCapturing)));
    Ok(())
}

#[tokio::test]
async fn channel_backend_records_only_once() -> Result<()> {
    let (_tx, rx) = mpsc::channel::<AudioFrame>(1);
    let mut backend = ChannelBackend::new(rx);

    let first = backend.start().await;
    assert!(first.is_ok());

    let second = backend.start().await;
    assert!(second.is_err(), "a consumed frame source cannot restart");
    Ok(())
}

#[tokio::test]
async fn artifact_open_rejects_missing_files() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.wav");
    assert!(CaptureArtifact::open(&missing).is_err());
}
