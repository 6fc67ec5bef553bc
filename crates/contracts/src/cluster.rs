//! Cluster - Merge Engine 输出
//!
//! 同一舍入坐标键下合并的一组检测记录。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AcquisitionTimestamp, DetectionRecord};

/// Rounded coordinate key.
///
/// Coordinates are stored as integer multiples of `10^-precision` degrees so
/// that keys hash and order exactly. Field order makes the derived `Ord`
/// compare latitude, then longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClusterKey {
    pub lat_units: i64,
    pub lon_units: i64,
    pub precision: u8,
}

impl ClusterKey {
    fn scale(&self) -> f64 {
        10f64.powi(i32::from(self.precision))
    }

    /// Rounded latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.lat_units as f64 / self.scale()
    }

    /// Rounded longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.lon_units as f64 / self.scale()
    }
}

impl fmt::Display for ClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = usize::from(self.precision);
        write!(f, "({:.p$}, {:.p$})", self.latitude(), self.longitude())
    }
}

/// 火点簇
///
/// Only constructible from a first member and grown with [`Cluster::push`],
/// so `members` is never empty and `earliest` always indexes the member with
/// the smallest `(date, time)`. On equal timestamps the first-encountered
/// member is kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    /// 簇键
    key: ClusterKey,

    /// 成员记录 (输入顺序)
    members: Vec<DetectionRecord>,

    /// 最早成员下标
    earliest: usize,
}

impl Cluster {
    /// Start a cluster from its first member
    pub fn new(key: ClusterKey, first: DetectionRecord) -> Self {
        Self {
            key,
            members: vec![first],
            earliest: 0,
        }
    }

    /// Append a member; a strictly earlier timestamp becomes the new earliest
    pub fn push(&mut self, record: DetectionRecord) {
        if record.timestamp() < self.earliest_timestamp() {
            self.earliest = self.members.len();
        }
        self.members.push(record);
    }

    pub fn key(&self) -> ClusterKey {
        self.key
    }

    /// Members in input order
    pub fn members(&self) -> &[DetectionRecord] {
        &self.members
    }

    /// Index of the earliest member in [`Cluster::members`]
    pub fn earliest_index(&self) -> usize {
        self.earliest
    }

    /// Seen count
    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn earliest_member(&self) -> &DetectionRecord {
        &self.members[self.earliest]
    }

    pub fn earliest_timestamp(&self) -> AcquisitionTimestamp {
        self.earliest_member().timestamp()
    }

    /// First member in input order
    pub fn first_seen(&self) -> &DetectionRecord {
        &self.members[0]
    }

    /// Arithmetic mean of member coordinates `(lat, lon)`
    pub fn centroid(&self) -> (f64, f64) {
        let n = self.members.len() as f64;
        let (lat_sum, lon_sum) = self
            .members
            .iter()
            .fold((0.0, 0.0), |(lat, lon), r| (lat + r.latitude, lon + r.longitude));
        (lat_sum / n, lon_sum / n)
    }
}

/// Which coordinate stands for a cluster in the report and feature geometry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepresentativePoint {
    /// Raw coordinates of the earliest-timestamp member
    #[default]
    Earliest,
    /// Raw coordinates of the first member in input order
    FirstSeen,
    /// The rounded cluster key
    Rounded,
    /// Mean of member coordinates
    Centroid,
}

impl Cluster {
    /// `(lat, lon)` under the given policy
    pub fn representative(&self, policy: RepresentativePoint) -> (f64, f64) {
        match policy {
            RepresentativePoint::Earliest => {
                let r = self.earliest_member();
                (r.latitude, r.longitude)
            }
            RepresentativePoint::FirstSeen => {
                let r = self.first_seen();
                (r.latitude, r.longitude)
            }
            RepresentativePoint::Rounded => (self.key.latitude(), self.key.longitude()),
            RepresentativePoint::Centroid => self.centroid(),
        }
    }

    /// Report row under the given policy
    pub fn report_row(&self, policy: RepresentativePoint) -> ReportRow {
        let (latitude, longitude) = self.representative(policy);
        ReportRow {
            count: self.count(),
            earliest: self.earliest_timestamp(),
            latitude,
            longitude,
        }
    }
}

/// 报表行
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Seen Count
    pub count: usize,

    /// First Seen Date
    pub earliest: AcquisitionTimestamp,

    pub latitude: f64,

    pub longitude: f64,
}
