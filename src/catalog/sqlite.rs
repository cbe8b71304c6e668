use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};

use super::{power_label, CatalogError, MatchTarget, NewPump, PowerSource, Pump, PumpCatalog, PumpQuery, PumpStore};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS pumps (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    name      TEXT NOT NULL,
    brand     TEXT NOT NULL,
    flow_rate REAL,          -- L/h
    head      REAL,          -- m
    power     TEXT,          -- electric | diesel | solar | NULL(범용)
    price     REAL NOT NULL
);
"#;

const COLUMNS: &str = "id, name, brand, flow_rate, head, power, price";

/// SQLite 기반 카탈로그.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        }
        let conn = Connection::open(path).map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        let catalog = Self {
            conn: Mutex::new(conn),
        };
        catalog.init_schema()?;
        info!("SQLite 카탈로그 열기: {}", path.display());
        Ok(catalog)
    }

    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory().map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        let catalog = Self {
            conn: Mutex::new(conn),
        };
        catalog.init_schema()?;
        Ok(catalog)
    }

    fn init_schema(&self) -> Result<(), CatalogError> {
        self.lock()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn
            .lock()
            .map_err(|_| CatalogError::Unavailable("connection lock poisoned".into()))
    }

    /// 테이블이 비어 있을 때만 시드 데이터를 넣는다. 넣은 건수를 반환한다.
    pub fn seed_if_empty(&self, pumps: Vec<NewPump>) -> Result<usize, CatalogError> {
        let count: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM pumps", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(0);
        }
        let n = pumps.len();
        for pump in pumps {
            self.add(pump)?;
        }
        Ok(n)
    }
}

fn pump_from_row(row: &Row<'_>) -> rusqlite::Result<Pump> {
    let power: Option<String> = row.get(5)?;
    let power = match power {
        Some(text) => Some(text.parse::<PowerSource>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                e.into(),
            )
        })?),
        None => None,
    };
    Ok(Pump {
        id: row.get(0)?,
        name: row.get(1)?,
        brand: row.get(2)?,
        flow_rate: row.get(3)?,
        head: row.get(4)?,
        power,
        price: row.get(6)?,
    })
}

impl PumpCatalog for SqliteCatalog {
    fn find_pumps(
        &self,
        query: &PumpQuery,
        best: Option<&MatchTarget>,
    ) -> Result<Vec<Pump>, CatalogError> {
        let mut sql = format!(
            "SELECT {COLUMNS} FROM pumps \
             WHERE flow_rate IS NOT NULL AND flow_rate BETWEEN ?1 AND ?2 \
             AND head IS NOT NULL AND head BETWEEN ?3 AND ?4 \
             AND (?5 IS NULL OR power IS NULL OR LOWER(power) = ?5)"
        );
        let power = query.power.map(|p| p.as_str());
        let mut args: Vec<&dyn ToSql> = vec![
            &query.min_flow_lph,
            &query.max_flow_lph,
            &query.min_head_m,
            &query.max_head_m,
            &power,
        ];
        if let Some(target) = best {
            sql.push_str(" ORDER BY ABS(flow_rate - ?6) ASC, ABS(head - ?7) ASC, id ASC LIMIT 1");
            args.push(&target.flow_lph);
            args.push(&target.head_m);
        } else {
            sql.push_str(" ORDER BY id ASC");
        }
        debug!("범위 조회 SQL: {sql}");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(args.as_slice(), pump_from_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn list_all(&self) -> Result<Vec<Pump>, CatalogError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM pumps ORDER BY id"))?;
        let rows = stmt.query_map([], pump_from_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

impl PumpStore for SqliteCatalog {
    fn add(&self, pump: NewPump) -> Result<Pump, CatalogError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO pumps (name, brand, flow_rate, head, power, price) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                pump.name,
                pump.brand,
                pump.flow_rate,
                pump.head,
                pump.power.map(|p| p.as_str()),
                pump.price
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!("펌프 추가: id={id} {}", pump.name);
        Ok(pump.into_pump(id))
    }

    fn update(&self, id: i64, pump: NewPump) -> Result<Option<Pump>, CatalogError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE pumps SET name = ?2, brand = ?3, flow_rate = ?4, head = ?5, power = ?6, price = ?7 WHERE id = ?1",
            params![
                id,
                pump.name,
                pump.brand,
                pump.flow_rate,
                pump.head,
                pump.power.map(|p| p.as_str()),
                pump.price
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        info!("펌프 수정: id={id}");
        Ok(Some(pump.into_pump(id)))
    }

    fn delete(&self, id: i64) -> Result<Option<Pump>, CatalogError> {
        let conn = self.lock()?;
        let existing = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM pumps WHERE id = ?1"),
                params![id],
                pump_from_row,
            )
            .optional()?;
        if existing.is_some() {
            conn.execute("DELETE FROM pumps WHERE id = ?1", params![id])?;
            info!("펌프 삭제: id={id}");
        }
        Ok(existing)
    }

    fn count_by_power(&self) -> Result<BTreeMap<String, usize>, CatalogError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT LOWER(power), COUNT(*) FROM pumps GROUP BY LOWER(power)")?;
        let rows = stmt.query_map([], |row| {
            let power: Option<String> = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((power, count))
        })?;
        let mut counts = BTreeMap::new();
        for row in rows {
            let (power, count) = row?;
            let power = match power {
                Some(text) => Some(text.parse::<PowerSource>().map_err(CatalogError::Storage)?),
                None => None,
            };
            counts.insert(power_label(power), count.max(0) as usize);
        }
        Ok(counts)
    }
}
