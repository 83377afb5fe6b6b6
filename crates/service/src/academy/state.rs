use std::collections::HashMap;

use models::{errors::ModelError, AdminAccount, CandidateAccount, StoreDocument};
use serde_json::Value;

/// Which per-candidate log a record is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ledger {
    Techniques,
    Sessions,
}

impl Ledger {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Ledger::Techniques => "completedTechniques",
            Ledger::Sessions => "customerSessions",
        }
    }
}

/// In-memory store: the persisted document plus lookup indices.
///
/// Accounts are never removed, so positions stored in the indices stay valid
/// except for the last entry popped by a rollback, which also drops its keys.
pub(crate) struct StoreState {
    doc: StoreDocument,
    admin_by_id: HashMap<String, usize>,
    candidate_by_id: HashMap<String, usize>,
    candidate_by_number: HashMap<String, usize>,
}

impl StoreState {
    pub(crate) fn from_document(doc: StoreDocument) -> Result<Self, ModelError> {
        doc.check_unique_keys()?;
        let admin_by_id = doc.admins.iter().enumerate().map(|(i, a)| (a.id.clone(), i)).collect();
        let candidate_by_id = doc.users.iter().enumerate().map(|(i, u)| (u.id.clone(), i)).collect();
        let candidate_by_number = doc
            .users
            .iter()
            .enumerate()
            .map(|(i, u)| (u.application_number.clone(), i))
            .collect();
        Ok(Self { doc, admin_by_id, candidate_by_id, candidate_by_number })
    }

    pub(crate) fn seeded() -> Self {
        let doc = StoreDocument::seeded();
        let admin_by_id = doc.admins.iter().enumerate().map(|(i, a)| (a.id.clone(), i)).collect();
        Self { doc, admin_by_id, candidate_by_id: HashMap::new(), candidate_by_number: HashMap::new() }
    }

    pub(crate) fn document(&self) -> &StoreDocument {
        &self.doc
    }

    pub(crate) fn admin(&self, id: &str) -> Option<&AdminAccount> {
        self.admin_by_id.get(id).map(|&i| &self.doc.admins[i])
    }

    pub(crate) fn admin_mut(&mut self, id: &str) -> Option<&mut AdminAccount> {
        let i = *self.admin_by_id.get(id)?;
        Some(&mut self.doc.admins[i])
    }

    pub(crate) fn candidates(&self) -> &[CandidateAccount] {
        &self.doc.users
    }

    pub(crate) fn candidate(&self, pos: usize) -> &CandidateAccount {
        &self.doc.users[pos]
    }

    pub(crate) fn candidate_mut(&mut self, pos: usize) -> &mut CandidateAccount {
        &mut self.doc.users[pos]
    }

    /// Position of the candidate with this internal id.
    pub(crate) fn candidate_by_id(&self, id: &str) -> Option<usize> {
        self.candidate_by_id.get(id).copied()
    }

    pub(crate) fn has_application_number(&self, number: &str) -> bool {
        self.candidate_by_number.contains_key(number)
    }

    /// Candidates whose application number or internal id equals `key`, in
    /// insertion order. At most two entries.
    pub(crate) fn candidates_by_key(&self, key: &str) -> Vec<usize> {
        let mut hits: Vec<usize> = self
            .candidate_by_number
            .get(key)
            .into_iter()
            .chain(self.candidate_by_id.get(key))
            .copied()
            .collect();
        hits.sort_unstable();
        hits.dedup();
        hits
    }

    pub(crate) fn push_admin(&mut self, admin: AdminAccount) {
        self.admin_by_id.insert(admin.id.clone(), self.doc.admins.len());
        self.doc.admins.push(admin);
    }

    pub(crate) fn pop_admin(&mut self) {
        if let Some(a) = self.doc.admins.pop() {
            self.admin_by_id.remove(&a.id);
        }
    }

    pub(crate) fn push_candidate(&mut self, candidate: CandidateAccount) {
        let pos = self.doc.users.len();
        self.candidate_by_id.insert(candidate.id.clone(), pos);
        self.candidate_by_number.insert(candidate.application_number.clone(), pos);
        self.doc.users.push(candidate);
    }

    pub(crate) fn pop_candidate(&mut self) {
        if let Some(c) = self.doc.users.pop() {
            self.candidate_by_id.remove(&c.id);
            self.candidate_by_number.remove(&c.application_number);
        }
    }

    /// `u_<millis>`, bumped forward until it does not collide.
    pub(crate) fn next_candidate_id(&self, mut millis: i64) -> String {
        loop {
            let id = models::candidate::candidate_id(millis);
            if !self.candidate_by_id.contains_key(&id) {
                return id;
            }
            millis += 1;
        }
    }

    pub(crate) fn ledger_mut(&mut self, pos: usize, ledger: Ledger) -> &mut Vec<Value> {
        let c = &mut self.doc.users[pos];
        match ledger {
            Ledger::Techniques => &mut c.completed_techniques,
            Ledger::Sessions => &mut c.customer_sessions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dual_key_lookup_covers_id_and_number() {
        let mut s = StoreState::seeded();
        s.push_candidate(CandidateAccount::new("u_1".into(), "A100", "p", 1));
        s.push_candidate(CandidateAccount::new("u_2".into(), "u_1", "p", 2));
        assert_eq!(s.candidates_by_key("A100"), vec![0]);
        assert_eq!(s.candidates_by_key("u_2"), vec![1]);
        // one candidate's id is another's application number
        assert_eq!(s.candidates_by_key("u_1"), vec![0, 1]);
        assert!(s.candidates_by_key("nope").is_empty());
    }

    #[test]
    fn pop_undoes_push_including_indices() {
        let mut s = StoreState::seeded();
        s.push_candidate(CandidateAccount::new("u_1".into(), "A100", "p", 1));
        s.pop_candidate();
        assert!(s.candidate_by_id("u_1").is_none());
        assert!(!s.has_application_number("A100"));

        s.push_admin(AdminAccount::registered("ops", "pw"));
        assert!(s.admin("ops").is_some());
        s.pop_admin();
        assert!(s.admin("ops").is_none());
        assert!(s.admin("admin").is_some());
    }

    #[test]
    fn generated_ids_skip_taken_ones() {
        let mut s = StoreState::seeded();
        s.push_candidate(CandidateAccount::new("u_5".into(), "A", "p", 5));
        s.push_candidate(CandidateAccount::new("u_6".into(), "B", "p", 6));
        assert_eq!(s.next_candidate_id(5), "u_7");
        assert_eq!(s.next_candidate_id(9), "u_9");
    }

    #[test]
    fn duplicate_document_is_rejected() {
        let mut doc = StoreDocument::seeded();
        doc.users.push(CandidateAccount::new("u_1".into(), "A", "p", 1));
        doc.users.push(CandidateAccount::new("u_2".into(), "A", "p", 2));
        assert!(StoreState::from_document(doc).is_err());
    }
}
