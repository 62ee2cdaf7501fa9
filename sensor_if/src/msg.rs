//! # Sensor Message Envelope
//!
//! Every message delivered to the viewer carries the acquisition timestamp and
//! one typed payload. Consumers route on [`MessageKind`] rather than on the
//! payload itself.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::eqpt::{cam::CamImage, nav::NavSolution, scan::ScanPacket};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A timestamped sensor message.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SensorMessage {
    /// UTC timestamp at which the data was acquired
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// The payload
    pub data: SensorData,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Payloads which can be delivered by a sensor source.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum SensorData {
    NavSolution(NavSolution),
    ScanPacket(ScanPacket),
    CamImage(CamImage),
}

/// Type tag of a sensor payload.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    NavSolution,
    ScanPacket,
    CamImage,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SensorMessage {
    pub fn new(timestamp: DateTime<Utc>, data: SensorData) -> Self {
        Self { timestamp, data }
    }

    pub fn kind(&self) -> MessageKind {
        self.data.kind()
    }
}

impl SensorData {
    pub fn kind(&self) -> MessageKind {
        match self {
            SensorData::NavSolution(_) => MessageKind::NavSolution,
            SensorData::ScanPacket(_) => MessageKind::ScanPacket,
            SensorData::CamImage(_) => MessageKind::CamImage,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
