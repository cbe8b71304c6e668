//! 펌프 카탈로그 저장소.
//!
//! 계산 경로는 `PumpCatalog`(읽기 전용)만 사용하고, 관리자 경로만 `PumpStore`로 레코드를 변경한다.

pub mod memory;
pub mod query;
pub mod sqlite;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use memory::InMemoryCatalog;
pub use query::{MatchTarget, PumpQuery};
pub use sqlite::SqliteCatalog;

/// 카탈로그 접근 오류.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// 저장소에 접근할 수 없음 (잠금 실패, 연결 실패 등)
    #[error("카탈로그를 사용할 수 없습니다: {0}")]
    Unavailable(String),
    /// 저장소 쿼리/데이터 오류
    #[error("카탈로그 저장소 오류: {0}")]
    Storage(String),
    /// 시드 파일 오류
    #[error("카탈로그 시드 파일 오류: {0}")]
    Seed(String),
}

impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        CatalogError::Storage(err.to_string())
    }
}

/// 펌프 동력원. 카탈로그에서 NULL이면 모든 동력원 요청에 일치하는 범용 펌프이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerSource {
    Electric,
    Diesel,
    Solar,
}

impl PowerSource {
    pub const ALL: [PowerSource; 3] = [PowerSource::Electric, PowerSource::Diesel, PowerSource::Solar];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerSource::Electric => "electric",
            PowerSource::Diesel => "diesel",
            PowerSource::Solar => "solar",
        }
    }
}

impl fmt::Display for PowerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerSource {
    type Err = String;

    /// 대소문자를 구분하지 않는다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        PowerSource::ALL
            .into_iter()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| format!("알 수 없는 동력원: {s}"))
    }
}

/// 카탈로그 레코드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pump {
    pub id: i64,
    pub name: String,
    pub brand: String,
    /// 유량 [L/h]
    pub flow_rate: Option<f64>,
    /// 양정 [m]
    pub head: Option<f64>,
    pub power: Option<PowerSource>,
    pub price: f64,
}

/// id가 없는 펌프 데이터. 추가/수정/시드에 쓴다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPump {
    pub name: String,
    pub brand: String,
    #[serde(default)]
    pub flow_rate: Option<f64>,
    #[serde(default)]
    pub head: Option<f64>,
    #[serde(default)]
    pub power: Option<PowerSource>,
    pub price: f64,
}

impl NewPump {
    pub fn into_pump(self, id: i64) -> Pump {
        Pump {
            id,
            name: self.name,
            brand: self.brand,
            flow_rate: self.flow_rate,
            head: self.head,
            power: self.power,
            price: self.price,
        }
    }
}

/// 계산 경로가 사용하는 읽기 전용 카탈로그.
pub trait PumpCatalog {
    /// 범위/동력원 조건을 만족하는 펌프를 반환한다.
    /// `best`가 주어지면 (유량 거리, 양정 거리) 사전식 순서로 가장 가까운 한 개만 반환한다.
    fn find_pumps(
        &self,
        query: &PumpQuery,
        best: Option<&MatchTarget>,
    ) -> Result<Vec<Pump>, CatalogError>;

    /// 전체 카탈로그를 id 순으로 반환한다.
    fn list_all(&self) -> Result<Vec<Pump>, CatalogError>;
}

/// 관리자 경로가 사용하는 쓰기 가능한 카탈로그.
pub trait PumpStore: PumpCatalog {
    fn add(&self, pump: NewPump) -> Result<Pump, CatalogError>;
    /// 대상 id가 없으면 None.
    fn update(&self, id: i64, pump: NewPump) -> Result<Option<Pump>, CatalogError>;
    /// 대상 id가 없으면 None.
    fn delete(&self, id: i64) -> Result<Option<Pump>, CatalogError>;

    /// 동력원별 펌프 수. 동력원이 NULL인 범용 펌프는 `UNIVERSAL_POWER_LABEL` 키로 센다.
    fn count_by_power(&self) -> Result<BTreeMap<String, usize>, CatalogError> {
        let mut counts = BTreeMap::new();
        for pump in self.list_all()? {
            *counts.entry(power_label(pump.power)).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

/// 동력원이 지정되지 않은 펌프의 통계 라벨.
pub const UNIVERSAL_POWER_LABEL: &str = "any";

pub(crate) fn power_label(power: Option<PowerSource>) -> String {
    power
        .map(|p| p.as_str())
        .unwrap_or(UNIVERSAL_POWER_LABEL)
        .to_string()
}

#[derive(Debug, Default, Deserialize)]
struct SeedFile {
    #[serde(default)]
    pump: Vec<NewPump>,
}

/// `[[pump]]` 테이블 목록 형식의 TOML 시드를 파싱한다.
pub fn parse_seed(content: &str) -> Result<Vec<NewPump>, CatalogError> {
    let seed: SeedFile = toml::from_str(content).map_err(|e| CatalogError::Seed(e.to_string()))?;
    Ok(seed.pump)
}

/// 설정으로 고른 저장소. 계산 경로에는 `&dyn PumpCatalog`, 관리자 경로에는 `&dyn PumpStore`로 넘긴다.
pub enum CatalogBackend {
    Memory(InMemoryCatalog),
    Sqlite(SqliteCatalog),
}

impl CatalogBackend {
    fn store(&self) -> &dyn PumpStore {
        match self {
            CatalogBackend::Memory(c) => c,
            CatalogBackend::Sqlite(c) => c,
        }
    }
}

impl PumpCatalog for CatalogBackend {
    fn find_pumps(
        &self,
        query: &PumpQuery,
        best: Option<&MatchTarget>,
    ) -> Result<Vec<Pump>, CatalogError> {
        self.store().find_pumps(query, best)
    }

    fn list_all(&self) -> Result<Vec<Pump>, CatalogError> {
        self.store().list_all()
    }
}

impl PumpStore for CatalogBackend {
    fn add(&self, pump: NewPump) -> Result<Pump, CatalogError> {
        self.store().add(pump)
    }

    fn update(&self, id: i64, pump: NewPump) -> Result<Option<Pump>, CatalogError> {
        self.store().update(id, pump)
    }

    fn delete(&self, id: i64) -> Result<Option<Pump>, CatalogError> {
        self.store().delete(id)
    }

    fn count_by_power(&self) -> Result<BTreeMap<String, usize>, CatalogError> {
        self.store().count_by_power()
    }
}
