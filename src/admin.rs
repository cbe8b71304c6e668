//! 펌프 카탈로그 관리자 기능.
//!
//! 인증은 `Authenticator` 하나로 추상화한다. 조회(list/stats)는 인증 없이 가능하고,
//! 추가/수정/삭제는 `Role::Admin` 토큰이 있어야 한다.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogError, NewPump, Pump, PumpStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("인증되지 않은 토큰입니다")]
    Unauthenticated,
    #[error("관리자 권한이 필요합니다")]
    Forbidden,
}

/// 토큰 검증 capability.
pub trait Authenticator {
    fn verify(&self, token: &str) -> Result<Role, AuthError>;
}

/// 설정 파일의 토큰 목록과 비교하는 인증기.
/// 관리자 토큰이 설정되지 않았으면 관리자 권한은 누구도 얻지 못한다.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthenticator {
    admin_token: Option<String>,
    user_tokens: Vec<String>,
}

impl StaticTokenAuthenticator {
    pub fn new(admin_token: Option<String>) -> Self {
        Self {
            admin_token: admin_token.filter(|t| !t.trim().is_empty()),
            user_tokens: Vec::new(),
        }
    }

    /// 읽기 전용 사용자 토큰을 등록한다.
    pub fn with_user_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.user_tokens = tokens
            .into_iter()
            .map(Into::into)
            .filter(|t: &String| !t.trim().is_empty())
            .collect();
        self
    }
}

impl Authenticator for StaticTokenAuthenticator {
    fn verify(&self, token: &str) -> Result<Role, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }
        if self.admin_token.as_deref() == Some(token) {
            return Ok(Role::Admin);
        }
        if self.user_tokens.iter().any(|t| t == token) {
            return Ok(Role::User);
        }
        Err(AuthError::Unauthenticated)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("펌프 데이터 오류 [{field}]: {reason}")]
    InvalidPump { field: &'static str, reason: String },
    #[error("펌프 id {0} 을(를) 찾을 수 없습니다")]
    NotFound(i64),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// 카탈로그 통계.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: usize,
    /// 동력원별 펌프 수 (범용 펌프는 "any")
    pub by_power: BTreeMap<String, usize>,
}

pub struct AdminService<'a> {
    store: &'a dyn PumpStore,
    auth: &'a dyn Authenticator,
}

impl<'a> AdminService<'a> {
    pub fn new(store: &'a dyn PumpStore, auth: &'a dyn Authenticator) -> Self {
        Self { store, auth }
    }

    pub fn list(&self) -> Result<Vec<Pump>, AdminError> {
        Ok(self.store.list_all()?)
    }

    pub fn stats(&self) -> Result<CatalogStats, AdminError> {
        let by_power = self.store.count_by_power()?;
        let total = by_power.values().sum();
        Ok(CatalogStats { total, by_power })
    }

    pub fn add(&self, token: &str, pump: NewPump) -> Result<Pump, AdminError> {
        self.require_admin(token)?;
        validate_pump(&pump)?;
        Ok(self.store.add(pump)?)
    }

    pub fn update(&self, token: &str, id: i64, pump: NewPump) -> Result<Pump, AdminError> {
        self.require_admin(token)?;
        validate_pump(&pump)?;
        self.store.update(id, pump)?.ok_or(AdminError::NotFound(id))
    }

    pub fn delete(&self, token: &str, id: i64) -> Result<Pump, AdminError> {
        self.require_admin(token)?;
        self.store.delete(id)?.ok_or(AdminError::NotFound(id))
    }

    fn require_admin(&self, token: &str) -> Result<(), AuthError> {
        match self.auth.verify(token) {
            Ok(Role::Admin) => Ok(()),
            Ok(Role::User) => {
                warn!("관리자 아닌 토큰으로 쓰기 시도");
                Err(AuthError::Forbidden)
            }
            Err(err) => {
                warn!("관리자 인증 실패: {err}");
                Err(err)
            }
        }
    }
}

/// 이름/브랜드는 비어 있으면 안 되고, 수치는 유한한 0 이상이어야 한다.
pub fn validate_pump(pump: &NewPump) -> Result<(), AdminError> {
    if pump.name.trim().is_empty() {
        return Err(invalid("name", "비어 있을 수 없습니다"));
    }
    if pump.brand.trim().is_empty() {
        return Err(invalid("brand", "비어 있을 수 없습니다"));
    }
    for (field, value) in [("flow_rate", pump.flow_rate), ("head", pump.head), ("price", Some(pump.price))] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(invalid(field, &format!("0 이상의 유한한 수여야 합니다 (현재 {v})")));
            }
        }
    }
    debug!("펌프 데이터 검증 통과: {}", pump.name);
    Ok(())
}

fn invalid(field: &'static str, reason: &str) -> AdminError {
    AdminError::InvalidPump {
        field,
        reason: reason.to_string(),
    }
}
