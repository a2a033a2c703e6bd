pub mod naming;
pub mod types;

pub use naming::{
    CONTAINER_PREFIX, DATA_ROOT_DIR, DB_ALIAS, SOLR_ALIAS, container_name, project_containers,
};
pub use types::*;
