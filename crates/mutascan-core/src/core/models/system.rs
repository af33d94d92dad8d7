use super::chain::Chain;
use super::ids::{ChainId, ResidueId};
use super::residue::{AtomRecord, Residue};
use slotmap::SlotMap;
use std::collections::HashMap;

/// The topology of one model of the structure under scan.
///
/// Chains and residues are stored in slot maps with stable IDs; traversal
/// order is preserved from the source file so that position enumeration is
/// deterministic. The model is read-only once loaded: mutants are expressed
/// as files written from it, never as in-place edits.
#[derive(Debug, Clone, Default)]
pub struct StructuralModel {
    residues: SlotMap<ResidueId, Residue>,
    chains: SlotMap<ChainId, Chain>,
    /// Chain IDs in the order their first atom appeared in the file.
    chain_order: Vec<ChainId>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_id_map: HashMap<char, ChainId>,
    /// Number of models the source file declared (1 for single-model files).
    model_count: usize,
}

impl StructuralModel {
    pub fn new() -> Self {
        Self {
            model_count: 1,
            ..Self::default()
        }
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Finds a chain by its single-character identifier.
    pub fn find_chain(&self, chain_id: char) -> Option<ChainId> {
        self.chain_id_map.get(&chain_id).copied()
    }

    /// Chains in file order.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|c| (id, c)))
    }

    /// Residues of a chain in sequence order.
    pub fn chain_residues(&self, id: ChainId) -> impl Iterator<Item = &Residue> {
        self.chains
            .get(id)
            .map(|c| c.residues.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|&rid| self.residues.get(rid))
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn model_count(&self) -> usize {
        self.model_count
    }

    pub fn is_multi_model(&self) -> bool {
        self.model_count > 1
    }

    pub(crate) fn set_model_count(&mut self, count: usize) {
        self.model_count = count.max(1);
    }

    /// Returns the existing chain with this identifier or creates a new one.
    pub(crate) fn ensure_chain(&mut self, chain_id: char) -> ChainId {
        if let Some(&id) = self.chain_id_map.get(&chain_id) {
            return id;
        }
        let id = self.chains.insert(Chain::new(chain_id));
        self.chain_order.push(id);
        self.chain_id_map.insert(chain_id, id);
        id
    }

    pub(crate) fn add_residue(
        &mut self,
        chain: ChainId,
        number: isize,
        insertion_code: char,
        name: &str,
    ) -> ResidueId {
        let id = self
            .residues
            .insert(Residue::new(number, insertion_code, name, chain));
        if let Some(c) = self.chains.get_mut(chain) {
            c.residues.push(id);
        }
        id
    }

    pub(crate) fn add_atom(&mut self, residue: ResidueId, atom: AtomRecord) {
        if let Some(r) = self.residues.get_mut(residue) {
            r.add_atom(atom);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(serial: i32, name: &str) -> AtomRecord {
        AtomRecord {
            serial,
            name: name.to_string(),
            alt_loc: ' ',
            position: [0.0, 0.0, 0.0],
            occupancy: 1.0,
            b_factor: 0.0,
            element: name.chars().take(1).collect(),
        }
    }

    #[test]
    fn ensure_chain_is_idempotent() {
        let mut model = StructuralModel::new();
        let a1 = model.ensure_chain('A');
        let a2 = model.ensure_chain('A');
        let b = model.ensure_chain('B');
        assert_eq!(a1, a2);
        assert_ne!(a1, b);
        assert_eq!(model.chains_iter().count(), 2);
    }

    #[test]
    fn chain_order_follows_insertion_order() {
        let mut model = StructuralModel::new();
        model.ensure_chain('B');
        model.ensure_chain('A');
        let ids: Vec<char> = model.chains_iter().map(|(_, c)| c.id).collect();
        assert_eq!(ids, vec!['B', 'A']);
    }

    #[test]
    fn chain_residues_preserve_sequence_order() {
        let mut model = StructuralModel::new();
        let chain = model.ensure_chain('A');
        model.add_residue(chain, 3, ' ', "GLY");
        model.add_residue(chain, 4, ' ', "ALA");
        model.add_residue(chain, 5, ' ', "SER");
        let numbers: Vec<isize> = model.chain_residues(chain).map(|r| r.number).collect();
        assert_eq!(numbers, vec![3, 4, 5]);
    }

    #[test]
    fn atoms_accumulate_on_their_residue() {
        let mut model = StructuralModel::new();
        let chain = model.ensure_chain('A');
        let res = model.add_residue(chain, 1, ' ', "GLY");
        model.add_atom(res, atom(1, "N"));
        model.add_atom(res, atom(2, "CA"));
        assert_eq!(model.residue(res).unwrap().atoms().len(), 2);
    }

    #[test]
    fn find_chain_misses_unknown_identifiers() {
        let mut model = StructuralModel::new();
        model.ensure_chain('A');
        assert!(model.find_chain('A').is_some());
        assert!(model.find_chain('Z').is_none());
    }

    #[test]
    fn model_count_defaults_to_one() {
        let model = StructuralModel::new();
        assert_eq!(model.model_count(), 1);
        assert!(!model.is_multi_model());
    }
}
