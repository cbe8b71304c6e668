use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::catalog::{CatalogBackend, CatalogError, InMemoryCatalog, SqliteCatalog};
use crate::scenario::ScenarioStandards;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 카탈로그 저장소 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogBackendKind {
    /// TOML 시드를 메모리에 올린다. 변경 사항은 종료 시 사라진다.
    Memory,
    /// SQLite 파일. 비어 있으면 시드로 채운다.
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub backend: CatalogBackendKind,
    pub seed_path: PathBuf,
    pub sqlite_path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backend: CatalogBackendKind::Memory,
            seed_path: PathBuf::from("data/pumps.toml"),
            sqlite_path: PathBuf::from("data/pumps.sqlite3"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// 관리자 토큰. 없으면 카탈로그 쓰기가 모두 거부된다.
    pub token: Option<String>,
    /// 읽기 전용 사용자 토큰
    pub user_tokens: Vec<String>,
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// "auto" | "ko" | "en"
    pub language: String,
    pub log_level: Option<String>,
    pub catalog: CatalogConfig,
    pub admin: AdminConfig,
    pub standards: ScenarioStandards,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            log_level: None,
            catalog: CatalogConfig::default(),
            admin: AdminConfig::default(),
            standards: ScenarioStandards::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("기준표 설정 오류: {0}")]
    InvalidStandards(String),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    let cfg = if path.exists() {
        let content = fs::read_to_string(path)?;
        toml::from_str::<Config>(&content)?
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        info!("기본 설정 파일 생성: {}", path.display());
        cfg
    };
    cfg.standards
        .validate()
        .map_err(ConfigError::InvalidStandards)?;
    Ok(cfg)
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 설정된 저장소를 연다. 시드 파일이 없으면 빈 카탈로그로 시작한다.
    pub fn open_catalog(&self) -> Result<CatalogBackend, CatalogError> {
        let seed_path = self.catalog.seed_path.as_path();
        match self.catalog.backend {
            CatalogBackendKind::Memory => {
                if seed_path.exists() {
                    Ok(CatalogBackend::Memory(InMemoryCatalog::load_seed(seed_path)?))
                } else {
                    warn!("시드 파일이 없어 빈 카탈로그로 시작합니다: {}", seed_path.display());
                    Ok(CatalogBackend::Memory(InMemoryCatalog::new()))
                }
            }
            CatalogBackendKind::Sqlite => {
                let catalog = SqliteCatalog::open(&self.catalog.sqlite_path)?;
                if seed_path.exists() {
                    let content = fs::read_to_string(seed_path)
                        .map_err(|e| CatalogError::Seed(format!("{}: {e}", seed_path.display())))?;
                    let inserted = catalog.seed_if_empty(crate::catalog::parse_seed(&content)?)?;
                    if inserted > 0 {
                        info!("SQLite 카탈로그 시드 {inserted}건 삽입");
                    }
                }
                Ok(CatalogBackend::Sqlite(catalog))
            }
        }
    }
}
