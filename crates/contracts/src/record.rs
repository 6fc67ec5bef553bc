//! DetectionRecord - Ingestion 输出
//!
//! 单条卫星火点检测记录：位置 + 采集时间 + 来源标记。

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ContractError;

/// Date format used by source feeds and the output collection
pub const ACQ_DATE_FORMAT: &str = "%Y-%m-%d";

/// 采集时刻 (24 小时制, "HHMM")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AcquisitionTime {
    hour: u8,
    minute: u8,
}

impl AcquisitionTime {
    /// Create from hour and minute, rejecting out-of-range values
    pub fn new(hour: u8, minute: u8) -> Result<Self, ContractError> {
        if hour > 23 || minute > 59 {
            return Err(ContractError::invalid_record(
                "acq_time",
                format!("{hour:02}{minute:02} is not a valid 24-hour clock time"),
            ));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl FromStr for AcquisitionTime {
    type Err = ContractError;

    /// Parses `HHMM`. Feeds that store the time as an integer drop leading
    /// zeros (`636` for 06:36), so 1-3 digit values are left-padded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.len() > 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ContractError::invalid_record(
                "acq_time",
                format!("expected HHMM, got '{s}'"),
            ));
        }
        let padded = format!("{s:0>4}");
        let hour = padded[..2].parse::<u8>().map_err(|e| {
            ContractError::invalid_record("acq_time", format!("bad hour in '{s}': {e}"))
        })?;
        let minute = padded[2..].parse::<u8>().map_err(|e| {
            ContractError::invalid_record("acq_time", format!("bad minute in '{s}': {e}"))
        })?;
        Self::new(hour, minute)
    }
}

impl fmt::Display for AcquisitionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.hour, self.minute)
    }
}

impl TryFrom<String> for AcquisitionTime {
    type Error = ContractError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AcquisitionTime> for String {
    fn from(value: AcquisitionTime) -> Self {
        value.to_string()
    }
}

/// `(date, time)` pair; derived `Ord` compares date first, then time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AcquisitionTimestamp {
    pub date: NaiveDate,
    pub time: AcquisitionTime,
}

impl fmt::Display for AcquisitionTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}:{:02}:00",
            self.date.format(ACQ_DATE_FORMAT),
            self.time.hour,
            self.time.minute
        )
    }
}

/// Provenance tag naming the source a record was read from
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceTag(String);

impl SourceTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 火点检测记录
///
/// 入库后不可变。`extra` 保存核心算法不使用的源字段 (confidence, satellite, ...)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// 纬度 (度), [-90, 90]
    pub latitude: f64,

    /// 经度 (度), [-180, 180]
    pub longitude: f64,

    /// 采集日期
    pub acq_date: NaiveDate,

    /// 采集时刻
    pub acq_time: AcquisitionTime,

    /// 来源标记
    pub source: SourceTag,

    /// 透传字段
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl DetectionRecord {
    /// Create a record, checking coordinate ranges
    pub fn new(
        latitude: f64,
        longitude: f64,
        acq_date: NaiveDate,
        acq_time: AcquisitionTime,
        source: SourceTag,
    ) -> Result<Self, ContractError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ContractError::invalid_record(
                "latitude",
                format!("{latitude} is outside [-90, 90]"),
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ContractError::invalid_record(
                "longitude",
                format!("{longitude} is outside [-180, 180]"),
            ));
        }
        Ok(Self {
            latitude,
            longitude,
            acq_date,
            acq_time,
            source,
            extra: BTreeMap::new(),
        })
    }

    /// Attach passthrough fields
    pub fn with_extra(mut self, extra: BTreeMap<String, String>) -> Self {
        self.extra = extra;
        self
    }

    pub fn timestamp(&self) -> AcquisitionTimestamp {
        AcquisitionTimestamp {
            date: self.acq_date,
            time: self.acq_time,
        }
    }
}
