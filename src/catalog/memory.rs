use std::fs;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info};

use super::query::rank_nearest;
use super::{parse_seed, CatalogError, MatchTarget, NewPump, Pump, PumpCatalog, PumpQuery, PumpStore};

/// 메모리 카탈로그. 레코드는 삽입 순서(= id 순)로 보관한다.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    pumps: Vec<Pump>,
    next_id: i64,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 주어진 순서대로 id 1부터 부여하여 카탈로그를 만든다.
    pub fn from_pumps<I>(pumps: I) -> Self
    where
        I: IntoIterator<Item = NewPump>,
    {
        let pumps: Vec<Pump> = pumps
            .into_iter()
            .enumerate()
            .map(|(i, p)| p.into_pump(i as i64 + 1))
            .collect();
        let next_id = pumps.len() as i64 + 1;
        Self {
            inner: RwLock::new(Inner { pumps, next_id }),
        }
    }

    /// TOML 시드 파일에서 카탈로그를 읽는다.
    pub fn load_seed(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)
            .map_err(|e| CatalogError::Seed(format!("{}: {e}", path.display())))?;
        let pumps = parse_seed(&content)?;
        info!("펌프 시드 {}건 로드: {}", pumps.len(), path.display());
        Ok(Self::from_pumps(pumps))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, CatalogError> {
        self.inner
            .read()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, CatalogError> {
        self.inner
            .write()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".into()))
    }
}

impl PumpCatalog for InMemoryCatalog {
    fn find_pumps(
        &self,
        query: &PumpQuery,
        best: Option<&MatchTarget>,
    ) -> Result<Vec<Pump>, CatalogError> {
        let inner = self.read()?;
        let mut found: Vec<Pump> = inner
            .pumps
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        debug!("범위 조회 {:?} -> {}건", query, found.len());
        if let Some(target) = best {
            rank_nearest(&mut found, target);
            found.truncate(1);
        }
        Ok(found)
    }

    fn list_all(&self) -> Result<Vec<Pump>, CatalogError> {
        Ok(self.read()?.pumps.clone())
    }
}

impl PumpStore for InMemoryCatalog {
    fn add(&self, pump: NewPump) -> Result<Pump, CatalogError> {
        let mut inner = self.write()?;
        let id = inner.next_id.max(1);
        inner.next_id = id + 1;
        let pump = pump.into_pump(id);
        inner.pumps.push(pump.clone());
        info!("펌프 추가: id={} {}", pump.id, pump.name);
        Ok(pump)
    }

    fn update(&self, id: i64, pump: NewPump) -> Result<Option<Pump>, CatalogError> {
        let mut inner = self.write()?;
        let Some(slot) = inner.pumps.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        *slot = pump.into_pump(id);
        info!("펌프 수정: id={id}");
        Ok(Some(slot.clone()))
    }

    fn delete(&self, id: i64) -> Result<Option<Pump>, CatalogError> {
        let mut inner = self.write()?;
        let Some(pos) = inner.pumps.iter().position(|p| p.id == id) else {
            return Ok(None);
        };
        let removed = inner.pumps.remove(pos);
        info!("펌프 삭제: id={id}");
        Ok(Some(removed))
    }
}
