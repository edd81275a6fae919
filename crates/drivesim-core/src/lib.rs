//! # DriveSim Core Library
//!
//! Telemetry decode-and-smoothing pipeline for the DriveSim dashboard.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Fixed-width binary frame and JSON command decoding
//! - Normalization of raw device readings (tilt clamp, drive mode, gear label)
//! - Time-based smoothing of the speed readout and world tilt
//! - A dashboard sink surface and transport sources (WebSocket, TCP lines,
//!   channels)
//! - A pipeline coordinator that ties them together on one cooperative loop
//!
//! ## Example
//!
//! ```rust,ignore
//! use drivesim_core::prelude::*;
//!
//! let config = DashboardConfig::default();
//! let source = drivesim_core::transport::connect(&config.transport).await?;
//! let mut pipeline = Pipeline::new(TracingSink::default(), &config);
//! let stats = pipeline.run(source, CancellationToken::new()).await;
//! ```

pub mod clamp;
pub mod config;
pub mod dashboard;
pub mod demo;
pub mod pipeline;
pub mod protocol;
pub mod smoothing;
pub mod telemetry;
pub mod transport;
pub mod units;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::clamp::{StateClamp, MAX_TILT_DEG};
    pub use crate::config::{DashboardConfig, GaugeConfig, SmoothingConfig, TransportConfig};
    pub use crate::dashboard::{
        DashboardSink, DashboardUpdate, DriveModeDisplay, JsonLinesSink, RecordingSink,
        SpeedReadout, TracingSink, WorldTilt,
    };
    pub use crate::demo::DemoDevice;
    pub use crate::pipeline::{Pipeline, PipelineStats};
    pub use crate::protocol::{CommandCodec, FrameCodec, ProtocolError, TelemetryCommand};
    pub use crate::smoothing::{Channel, Smoother};
    pub use crate::telemetry::{DriveMode, Gear, RawVehicleState, VehicleState};
    pub use crate::transport::{
        ChannelSource, TcpLineSource, TransportError, TransportMessage, TransportSource,
        WebSocketSource,
    };
    pub use tokio_util::sync::CancellationToken;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
