//! Business logic services

pub mod catalog;
pub mod circulation;
pub mod home;
pub mod reference;
pub mod users;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub reference: reference::ReferenceService,
    pub circulation: circulation::CirculationService,
    pub home: home::HomeService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            reference: reference::ReferenceService::new(repository.clone()),
            circulation: circulation::CirculationService::new(repository.clone()),
            home: home::HomeService::new(repository),
        }
    }
}

/// `Ok(false)` for a missing row, other failures pass through
pub(crate) fn exists<T>(lookup: AppResult<T>) -> AppResult<bool> {
    match lookup {
        Ok(_) => Ok(true),
        Err(AppError::NotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}
