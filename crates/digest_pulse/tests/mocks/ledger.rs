use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use notes_ledger::Ledger;

#[derive(Clone, Default)]
pub struct MockLedger {
    pub processed: Arc<Mutex<Vec<String>>>,
    pub fail_reads: bool,
}

impl MockLedger {
    pub fn with_processed(ids: &[&str]) -> Self {
        Self {
            processed: Arc::new(Mutex::new(ids.iter().map(|id| id.to_string()).collect())),
            fail_reads: false,
        }
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Default::default()
        }
    }
}

impl Ledger for MockLedger {
    async fn get_processed_ids(&self, video_ids: &[&str]) -> anyhow::Result<HashSet<String>> {
        if self.fail_reads {
            return Err(anyhow::anyhow!("ledger unavailable"));
        }
        let processed = self.processed.lock().unwrap();
        Ok(video_ids
            .iter()
            .filter(|id| processed.iter().any(|p| p == **id))
            .map(|id| id.to_string())
            .collect())
    }

    async fn mark_processed(&self, video_id: &str) -> anyhow::Result<()> {
        let mut processed = self.processed.lock().unwrap();
        if !processed.iter().any(|p| p == video_id) {
            processed.push(video_id.to_string());
        }
        Ok(())
    }

    async fn processed_ids(&self) -> Vec<String> {
        self.processed.lock().unwrap().clone()
    }
}
