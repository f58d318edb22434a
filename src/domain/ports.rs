use crate::domain::model::RosterEntry;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn history_path(&self) -> &str;
    fn history_limit(&self) -> usize;
    fn attempts(&self) -> usize;
    fn observer_marker(&self) -> &str;
}

#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RosterEntry>>;
}
