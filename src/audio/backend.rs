use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Audio capture backend trait
///
/// The platform microphone stack (Android/iOS capture primitive, cpal, etc.)
/// lives behind this seam. The embedding application injects its backend;
/// this crate ships `ChannelBackend` for hosts that already own a frame
/// source, and for tests.
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames. The
    /// backend holds the microphone exclusively until `stop` is called.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing audio and release the microphone
    ///
    /// After this resolves the frame channel must close, so a recorder
    /// draining it can finish the file.
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Capture backend fed by an external frame channel
///
/// The producer side holds the `mpsc::Sender` and should watch
/// [`ChannelBackend::stop_watch`]: when it flips to `true`, stop sending and
/// drop the sender so the recorder sees end-of-stream.
pub struct ChannelBackend {
    frames: Option<mpsc::Receiver<AudioFrame>>,
    stop_tx: watch::Sender<bool>,
    capturing: bool,
}

impl ChannelBackend {
    pub fn new(frames: mpsc::Receiver<AudioFrame>) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            frames: Some(frames),
            stop_tx,
            capturing: false,
        }
    }

    /// Stop signal for the frame producer
    pub fn stop_watch(&self) -> watch::Receiver<bool> {
        self.stop_tx.subscribe()
    }
}

#[async_trait::async_trait]
impl CaptureBackend for ChannelBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        let rx = self
            .frames
            .take()
            .context("Frame source already consumed; ChannelBackend records once")?;
        self.capturing = true;
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.capturing = false;
        self.stop_tx.send_replace(true);
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "channel"
    }
}
