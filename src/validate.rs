//! The cross-field consistency validator (§4.5): a single synchronous pass
//! over a `Structure` that checks every invariant in §3 at once. Grounded
//! on `examples/original_source/include/mmtf/structure_data.hpp`'s
//! `hasConsistentData()`, which walks model→chain→group while accumulating
//! atom and bond counts; this port keeps that single-traversal shape but
//! returns the first failing invariant instead of a bare `bool` (§4.5,
//! "verbose" mode).

use crate::error::Error;
use crate::structure::Structure;

/// Alias, not a new taxonomy: every invariant failure is one of the
/// variants already enumerated in §7, so the validator reuses `crate::Error`
/// rather than inventing a parallel one.
pub type ValidationError = Error;

const VALID_BOND_ORDERS: [i8; 5] = [1, 2, 3, 4, -1];
const VALID_BOND_RESONANCES: [i8; 3] = [0, 1, -1];

/// Validate with the default chain-name width (4), the value every decoded
/// file uses unless the encoder was configured otherwise.
pub fn validate(s: &Structure) -> Result<(), ValidationError> {
    validate_with(s, 4)
}

/// Validate against a specific `chain_name_max_length`, matching whatever
/// `EncodeOptions` the caller intends to encode with.
pub fn validate_with(s: &Structure, chain_name_max_length: usize) -> Result<(), ValidationError> {
    check_exact_or_empty("bFactorList", s.b_factor_list.len(), s.num_atoms)?;
    check_exact_or_empty("atomIdList", s.atom_id_list.len(), s.num_atoms)?;
    check_exact_or_empty("altLocList", s.alt_loc_list.len(), s.num_atoms)?;
    check_exact_or_empty("occupancyList", s.occupancy_list.len(), s.num_atoms)?;
    check_exact_or_empty("secStructList", s.sec_struct_list.len(), s.num_groups)?;
    check_exact_or_empty("insCodeList", s.ins_code_list.len(), s.num_groups)?;
    check_exact_or_empty(
        "sequenceIndexList",
        s.sequence_index_list.len(),
        s.num_groups,
    )?;
    check_exact_or_empty("chainNameList", s.chain_name_list.len(), s.num_chains)?;

    check_exact("xCoordList", s.x_coord_list.len(), s.num_atoms)?;
    check_exact("yCoordList", s.y_coord_list.len(), s.num_atoms)?;
    check_exact("zCoordList", s.z_coord_list.len(), s.num_atoms)?;
    check_exact("groupIdList", s.group_id_list.len(), s.num_groups)?;
    check_exact("groupTypeList", s.group_type_list.len(), s.num_groups)?;
    check_exact("chainIdList", s.chain_id_list.len(), s.num_chains)?;
    check_exact("groupsPerChain", s.groups_per_chain.len(), s.num_chains)?;
    check_exact("chainsPerModel", s.chains_per_model.len(), s.num_models)?;

    for id in s.chain_id_list.iter().chain(s.chain_name_list.iter()) {
        if id.len() > chain_name_max_length {
            return Err(Error::FieldTooLong {
                field: "chainIdList",
                limit: chain_name_max_length,
            });
        }
    }

    for &idx in &s.group_type_list {
        if idx < 0 || idx as usize >= s.group_list.len() {
            return Err(Error::IndexOutOfRange {
                field: "groupTypeList",
                value: idx,
                max: s.group_list.len(),
            });
        }
    }

    for group in &s.group_list {
        check_group_bonds(group.bond_atom_list.len(), group.bond_order_list.len())?;
        check_bond_domain(&group.bond_order_list, &VALID_BOND_ORDERS)?;
        check_bond_domain(&group.bond_resonance_list, &VALID_BOND_RESONANCES)?;
        if !group.bond_resonance_list.is_empty()
            && group.bond_resonance_list.len() != group.bond_order_list.len()
        {
            return Err(Error::LengthMismatch {
                field: "bondResonanceList",
                expected: group.bond_order_list.len(),
                got: group.bond_resonance_list.len(),
            });
        }
        for &atom_idx in &group.bond_atom_list {
            if atom_idx < 0 || atom_idx as usize >= group.atom_count() {
                return Err(Error::IndexOutOfRange {
                    field: "bondAtomList",
                    value: atom_idx,
                    max: group.atom_count(),
                });
            }
        }
    }

    check_group_bonds(s.bond_atom_list.len(), s.bond_order_list.len())?;
    check_bond_domain(&s.bond_order_list, &VALID_BOND_ORDERS)?;
    check_bond_domain(&s.bond_resonance_list, &VALID_BOND_RESONANCES)?;
    if !s.bond_resonance_list.is_empty() && s.bond_resonance_list.len() != s.bond_order_list.len()
    {
        return Err(Error::LengthMismatch {
            field: "bondResonanceList",
            expected: s.bond_order_list.len(),
            got: s.bond_resonance_list.len(),
        });
    }
    for &atom_idx in &s.bond_atom_list {
        if atom_idx < 0 || atom_idx as usize >= s.num_atoms as usize {
            return Err(Error::IndexOutOfRange {
                field: "bondAtomList",
                value: atom_idx,
                max: s.num_atoms as usize,
            });
        }
    }

    for &v in &s.sec_struct_list {
        if !(-1..=7).contains(&v) {
            return Err(Error::Inconsistent {
                reason: format!("secStructList value {v} outside [-1, 7]"),
            });
        }
    }

    for (key, date) in [
        ("depositionDate", &s.deposition_date),
        ("releaseDate", &s.release_date),
    ] {
        if let Some(d) = date {
            if !is_valid_date(d) {
                return Err(Error::InvalidDateFormat { key });
            }
        }
    }

    for entity in &s.entity_list {
        for &chain_idx in &entity.chain_indices {
            check_chain_index(chain_idx, s.num_chains)?;
        }
    }
    for assembly in &s.bio_assembly_list {
        for transform in &assembly.transform_list {
            for &chain_idx in &transform.chain_index_list {
                check_chain_index(chain_idx, s.num_chains)?;
            }
        }
    }

    traverse(s)
}

fn check_exact(field: &'static str, got: usize, expected: i32) -> Result<(), Error> {
    if got != expected.max(0) as usize {
        return Err(Error::LengthMismatch {
            field,
            expected: expected.max(0) as usize,
            got,
        });
    }
    Ok(())
}

fn check_exact_or_empty(field: &'static str, got: usize, expected: i32) -> Result<(), Error> {
    if got == 0 {
        return Ok(());
    }
    check_exact(field, got, expected)
}

fn check_group_bonds(atom_list_len: usize, order_list_len: usize) -> Result<(), Error> {
    if atom_list_len != 2 * order_list_len {
        return Err(Error::LengthMismatch {
            field: "bondAtomList",
            expected: 2 * order_list_len,
            got: atom_list_len,
        });
    }
    Ok(())
}

fn check_bond_domain(values: &[i8], domain: &[i8]) -> Result<(), Error> {
    for &v in values {
        if !domain.contains(&v) {
            return Err(Error::Inconsistent {
                reason: format!("bond value {v} outside allowed domain {domain:?}"),
            });
        }
    }
    Ok(())
}

fn check_chain_index(idx: i32, num_chains: i32) -> Result<(), Error> {
    if idx < 0 || idx as usize >= num_chains as usize {
        return Err(Error::IndexOutOfRange {
            field: "chainIndexList",
            value: idx,
            max: num_chains as usize,
        });
    }
    Ok(())
}

fn is_valid_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes[0..4].iter().all(u8::is_ascii_digit)
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[8..10].iter().all(u8::is_ascii_digit)
}

/// The model→chain→group→atom walk: verifies atom/bond-count arrival,
/// sequence-index bounds, in one pass.
fn traverse(s: &Structure) -> Result<(), Error> {
    let mut chain_cursor = 0usize;
    let mut group_cursor = 0usize;
    let mut atom_cursor = 0usize;
    let mut group_internal_bonds = 0usize;

    for &n_chains in &s.chains_per_model {
        for _ in 0..n_chains.max(0) {
            let n_groups = *s.groups_per_chain.get(chain_cursor).ok_or(Error::Inconsistent {
                reason: "groupsPerChain shorter than chainsPerModel implies".to_string(),
            })?;
            for _ in 0..n_groups.max(0) {
                let group_type_idx =
                    *s.group_type_list
                        .get(group_cursor)
                        .ok_or(Error::Inconsistent {
                            reason: "groupTypeList shorter than groupsPerChain implies".to_string(),
                        })? as usize;
                let group = s.group_list.get(group_type_idx).ok_or(Error::IndexOutOfRange {
                    field: "groupTypeList",
                    value: group_type_idx as i32,
                    max: s.group_list.len(),
                })?;
                atom_cursor += group.atom_count();
                group_internal_bonds += group.bond_count();

                if let Some(&seq_idx) = s.sequence_index_list.get(group_cursor) {
                    if seq_idx != -1 {
                        if seq_idx < -1 {
                            return Err(Error::IndexOutOfRange {
                                field: "sequenceIndexList",
                                value: seq_idx,
                                max: 0,
                            });
                        }
                        if let Some(entity) = s
                            .entity_list
                            .iter()
                            .find(|e| e.chain_indices.contains(&(chain_cursor as i32)))
                        {
                            let seq_len = entity.sequence.chars().count();
                            if seq_idx as usize >= seq_len {
                                return Err(Error::IndexOutOfRange {
                                    field: "sequenceIndexList",
                                    value: seq_idx,
                                    max: seq_len,
                                });
                            }
                        }
                    }
                }

                group_cursor += 1;
            }
            chain_cursor += 1;
        }
    }

    if atom_cursor != s.num_atoms as usize {
        return Err(Error::LengthMismatch {
            field: "numAtoms",
            expected: atom_cursor,
            got: s.num_atoms as usize,
        });
    }
    if chain_cursor != s.num_chains as usize {
        return Err(Error::LengthMismatch {
            field: "numChains",
            expected: chain_cursor,
            got: s.num_chains as usize,
        });
    }
    if group_cursor != s.num_groups as usize {
        return Err(Error::LengthMismatch {
            field: "numGroups",
            expected: group_cursor,
            got: s.num_groups as usize,
        });
    }
    let total_bonds = group_internal_bonds + s.bond_order_list.len();
    if total_bonds != s.num_bonds as usize {
        return Err(Error::LengthMismatch {
            field: "numBonds",
            expected: total_bonds,
            got: s.num_bonds as usize,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::GroupType;

    #[test]
    fn empty_structure_is_consistent() {
        assert!(validate(&Structure::default()).is_ok());
    }

    #[test]
    fn atom_count_mismatch_is_caught() {
        let mut s = Structure::default();
        s.num_atoms = 1;
        s.x_coord_list = vec![1.0];
        s.y_coord_list = vec![1.0];
        s.z_coord_list = vec![1.0];
        s.num_groups = 1;
        s.group_id_list = vec![0];
        s.group_type_list = vec![0];
        s.num_chains = 1;
        s.chain_id_list = vec!["A".to_string()];
        s.groups_per_chain = vec![1];
        s.num_models = 1;
        s.chains_per_model = vec![1];
        s.group_list = vec![GroupType {
            atom_name_list: vec!["CA".to_string(), "CB".to_string()],
            element_list: vec!["C".to_string(), "C".to_string()],
            formal_charge_list: vec![0, 0],
            group_name: "ALA".to_string(),
            single_letter_code: b'A',
            chem_comp_type: "L-PEPTIDE LINKING".to_string(),
            ..GroupType::default()
        }];
        // the group template has 2 atoms but numAtoms/coords claim 1
        assert!(matches!(
            validate(&s),
            Err(Error::LengthMismatch { field: "numAtoms", .. })
        ));
    }

    #[test]
    fn bad_bond_order_is_rejected() {
        let mut s = Structure::default();
        s.bond_atom_list = vec![0, 1];
        s.bond_order_list = vec![9];
        s.num_atoms = 2;
        s.x_coord_list = vec![0.0, 0.0];
        s.y_coord_list = vec![0.0, 0.0];
        s.z_coord_list = vec![0.0, 0.0];
        assert!(matches!(validate(&s), Err(Error::Inconsistent { .. })));
    }

    #[test]
    fn group_bond_atom_index_out_of_range_is_caught() {
        let mut s = Structure::default();
        // a 2-atom template whose bond table references a third, nonexistent atom
        s.group_list = vec![GroupType {
            atom_name_list: vec!["CA".to_string(), "CB".to_string()],
            element_list: vec!["C".to_string(), "C".to_string()],
            formal_charge_list: vec![0, 0],
            bond_atom_list: vec![0, 99],
            bond_order_list: vec![1],
            group_name: "ALA".to_string(),
            single_letter_code: b'A',
            chem_comp_type: "L-PEPTIDE LINKING".to_string(),
            ..GroupType::default()
        }];
        assert!(matches!(
            validate(&s),
            Err(Error::IndexOutOfRange {
                field: "bondAtomList",
                ..
            })
        ));
    }
}
