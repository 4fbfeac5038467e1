use crate::models::{NewTransaction, Transaction};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Persistence seam for scored transactions
pub trait TransactionStore: Send + Sync {
    /// Assign an id and persist
    fn insert(&self, transaction: NewTransaction) -> Transaction;

    fn get(&self, id: Uuid) -> Option<Transaction>;

    /// All records, oldest first
    fn list(&self) -> Vec<Transaction>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store. Each record carries its insertion sequence so
/// listing is stable even for ids minted within the same millisecond.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    transactions: DashMap<Uuid, (u64, Transaction)>,
    sequence: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionStore for InMemoryStore {
    fn insert(&self, new: NewTransaction) -> Transaction {
        let transaction = Transaction {
            id: Uuid::now_v7(),
            user_id: new.user_id,
            amount: new.amount,
            channel: new.channel,
            timestamp: new.timestamp,
            score: new.score,
            status: new.status,
        };
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.transactions
            .insert(transaction.id, (seq, transaction.clone()));
        transaction
    }

    fn get(&self, id: Uuid) -> Option<Transaction> {
        self.transactions.get(&id).map(|entry| entry.value().1.clone())
    }

    fn list(&self) -> Vec<Transaction> {
        let mut all: Vec<(u64, Transaction)> = self
            .transactions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|(seq, _)| *seq);
        all.into_iter().map(|(_, tx)| tx).collect()
    }

    fn len(&self) -> usize {
        self.transactions.len()
    }
}
