use std::sync::Arc;

use crate::{
    db::{DbPool, OrmConn},
    services::profile_service::ProfileContextBuilder,
    storage::BlobStore,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub jwt_secret: Arc<str>,
    pub blobs: Arc<dyn BlobStore>,
    pub profile: ProfileContextBuilder,
}
