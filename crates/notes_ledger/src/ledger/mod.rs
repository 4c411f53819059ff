use std::{collections::HashSet, future::Future};

pub mod file;

pub trait Ledger {
    /// Returns the subset of `video_ids` already marked as processed.
    fn get_processed_ids(
        &self,
        video_ids: &[&str],
    ) -> impl Future<Output = anyhow::Result<HashSet<String>>> + Send;

    /// Records `video_id` as handled. Marking an id twice is a no-op.
    fn mark_processed(&self, video_id: &str) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Every processed id, in the order it was first recorded.
    fn processed_ids(&self) -> impl Future<Output = Vec<String>> + Send;
}

impl<T: Ledger + Send + Sync> Ledger for &T {
    async fn get_processed_ids(&self, video_ids: &[&str]) -> anyhow::Result<HashSet<String>> {
        (**self).get_processed_ids(video_ids).await
    }

    async fn mark_processed(&self, video_id: &str) -> anyhow::Result<()> {
        (**self).mark_processed(video_id).await
    }

    async fn processed_ids(&self) -> Vec<String> {
        (**self).processed_ids().await
    }
}
