//! The typed record layouts: `Structure` itself plus the four nested
//! MessagePack-map records it aggregates (`GroupType`, `Entity`, `Transform`,
//! `BioAssembly`). Grounded on `examples/original_source/include/mmtf/structure_data.hpp`'s
//! struct layout and default-value scheme, translated from sentinel-typed
//! C++ fields to `Option`/empty-`Vec` Rust fields per Design Notes
//! ("Optional columns").

/// A residue template shared by every position that references it through
/// `Structure::group_type_list`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupType {
    pub formal_charge_list: Vec<i32>,
    pub atom_name_list: Vec<String>,
    pub element_list: Vec<String>,
    pub bond_atom_list: Vec<i32>,
    pub bond_order_list: Vec<i8>,
    pub bond_resonance_list: Vec<i8>,
    pub group_name: String,
    /// A byte-code-point, never a platform `char` (Design Notes, "Strings
    /// of length 1").
    pub single_letter_code: u8,
    pub chem_comp_type: String,
}

impl GroupType {
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.atom_name_list.len()
    }

    #[must_use]
    pub fn bond_count(&self) -> usize {
        self.bond_order_list.len()
    }
}

/// A polymer/non-polymer grouping of chains sharing a reference sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entity {
    pub chain_indices: Vec<i32>,
    pub description: String,
    pub r#type: String,
    pub sequence: String,
}

/// One 4x4 affine transform within a `BioAssembly`, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub chain_index_list: Vec<i32>,
    pub matrix: [f32; 16],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            chain_index_list: Vec::new(),
            matrix: [0.0; 16],
        }
    }
}

/// A set of chain-index-bound affine transforms describing a biologically
/// relevant multimer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BioAssembly {
    pub name: String,
    pub transform_list: Vec<Transform>,
}

/// The canonical in-memory form of an MMTF file.
///
/// Opaque extension values (the six `*Properties` maps) are carried as
/// `rmpv::Value`, which owns all of its data — unlike the C++ `msgpack::object`
/// this is ported from, no separate arena field is needed to keep them alive
/// (see DESIGN.md, "arena / opaque values").
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    // --- metadata ---
    pub mmtf_version: String,
    pub mmtf_producer: String,
    pub structure_id: Option<String>,
    pub title: Option<String>,
    pub deposition_date: Option<String>,
    pub release_date: Option<String>,
    pub experimental_methods: Vec<String>,
    pub resolution: Option<f64>,
    pub r_free: Option<f64>,
    pub r_work: Option<f64>,

    // --- crystallography ---
    pub unit_cell: Option<[f64; 6]>,
    pub space_group: Option<String>,
    pub ncs_operator_list: Vec<[f32; 16]>,
    pub bio_assembly_list: Vec<BioAssembly>,

    // --- counts ---
    pub num_bonds: i32,
    pub num_atoms: i32,
    pub num_groups: i32,
    pub num_chains: i32,
    pub num_models: i32,

    // --- catalogs ---
    pub group_list: Vec<GroupType>,
    pub entity_list: Vec<Entity>,

    // --- per-atom columns ---
    pub x_coord_list: Vec<f32>,
    pub y_coord_list: Vec<f32>,
    pub z_coord_list: Vec<f32>,
    pub b_factor_list: Vec<f32>,
    pub atom_id_list: Vec<i32>,
    pub alt_loc_list: Vec<u8>,
    pub occupancy_list: Vec<f32>,

    // --- per-group columns ---
    pub group_id_list: Vec<i32>,
    pub group_type_list: Vec<i32>,
    pub sec_struct_list: Vec<i8>,
    pub ins_code_list: Vec<u8>,
    pub sequence_index_list: Vec<i32>,

    // --- per-chain columns ---
    pub chain_id_list: Vec<String>,
    pub chain_name_list: Vec<String>,
    pub groups_per_chain: Vec<i32>,

    // --- per-model column ---
    pub chains_per_model: Vec<i32>,

    // --- inter-group bonds ---
    pub bond_atom_list: Vec<i32>,
    pub bond_order_list: Vec<i8>,
    pub bond_resonance_list: Vec<i8>,

    // --- opaque extension maps, canonical key order per §4.6 ---
    pub bond_properties: rmpv::Value,
    pub atom_properties: rmpv::Value,
    pub group_properties: rmpv::Value,
    pub chain_properties: rmpv::Value,
    pub model_properties: rmpv::Value,
    pub extra_properties: rmpv::Value,
}

/// The major.minor version string this crate writes and accepts.
pub const SUPPORTED_VERSION: &str = "1.0";
pub const SUPPORTED_MAJOR_VERSION: u32 = 1;

impl Default for Structure {
    fn default() -> Self {
        Self {
            mmtf_version: SUPPORTED_VERSION.to_string(),
            mmtf_producer: format!("mmtf-rs {}", env!("CARGO_PKG_VERSION")),
            structure_id: None,
            title: None,
            deposition_date: None,
            release_date: None,
            experimental_methods: Vec::new(),
            resolution: None,
            r_free: None,
            r_work: None,
            unit_cell: None,
            space_group: None,
            ncs_operator_list: Vec::new(),
            bio_assembly_list: Vec::new(),
            num_bonds: 0,
            num_atoms: 0,
            num_groups: 0,
            num_chains: 0,
            num_models: 0,
            group_list: Vec::new(),
            entity_list: Vec::new(),
            x_coord_list: Vec::new(),
            y_coord_list: Vec::new(),
            z_coord_list: Vec::new(),
            b_factor_list: Vec::new(),
            atom_id_list: Vec::new(),
            alt_loc_list: Vec::new(),
            occupancy_list: Vec::new(),
            group_id_list: Vec::new(),
            group_type_list: Vec::new(),
            sec_struct_list: Vec::new(),
            ins_code_list: Vec::new(),
            sequence_index_list: Vec::new(),
            chain_id_list: Vec::new(),
            chain_name_list: Vec::new(),
            groups_per_chain: Vec::new(),
            chains_per_model: Vec::new(),
            bond_atom_list: Vec::new(),
            bond_order_list: Vec::new(),
            bond_resonance_list: Vec::new(),
            bond_properties: rmpv::Value::Map(Vec::new()),
            atom_properties: rmpv::Value::Map(Vec::new()),
            group_properties: rmpv::Value::Map(Vec::new()),
            chain_properties: rmpv::Value::Map(Vec::new()),
            model_properties: rmpv::Value::Map(Vec::new()),
            extra_properties: rmpv::Value::Map(Vec::new()),
        }
    }
}

impl Structure {
    /// `major` component of `mmtf_version`, or `None` if it doesn't parse.
    #[must_use]
    pub fn major_version(&self) -> Option<u32> {
        self.mmtf_version.split('.').next()?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_structure_self_identifies() {
        let s = Structure::default();
        assert_eq!(s.mmtf_version, "1.0");
        assert!(s.mmtf_producer.starts_with("mmtf-rs"));
        assert_eq!(s.num_atoms, 0);
    }

    #[test]
    fn major_version_parses() {
        let mut s = Structure::default();
        s.mmtf_version = "1.2".to_string();
        assert_eq!(s.major_version(), Some(1));
        s.mmtf_version = "bogus".to_string();
        assert_eq!(s.major_version(), None);
    }
}
