//! End-to-end decode/encode coverage, exercising the full key table rather
//! than one codec at a time. Mirrors the shape of the teacher's
//! `test_bitcode_reader.rs`, which drove the parser against whole fixture
//! files instead of isolated unit pieces.

use mmtf::structure::{BioAssembly, Entity, GroupType, Structure, Transform};
use mmtf::{decode_from_buffer, encode_to_buffer, EncodeOptions, Error};

fn water_group() -> GroupType {
    GroupType {
        formal_charge_list: vec![0, 0, 0],
        atom_name_list: vec!["O".to_string(), "H1".to_string(), "H2".to_string()],
        element_list: vec!["O".to_string(), "H".to_string(), "H".to_string()],
        bond_atom_list: vec![0, 1, 0, 2],
        bond_order_list: vec![1, 1],
        bond_resonance_list: Vec::new(),
        group_name: "HOH".to_string(),
        single_letter_code: b'?',
        chem_comp_type: "NON-POLYMER".to_string(),
    }
}

fn alanine_group() -> GroupType {
    GroupType {
        formal_charge_list: vec![0, 0],
        atom_name_list: vec!["CA".to_string(), "CB".to_string()],
        element_list: vec!["C".to_string(), "C".to_string()],
        bond_atom_list: vec![0, 1],
        bond_order_list: vec![1],
        bond_resonance_list: Vec::new(),
        group_name: "ALA".to_string(),
        single_letter_code: b'A',
        chem_comp_type: "L-PEPTIDE LINKING".to_string(),
    }
}

/// One model, one chain, two groups (an alanine then a water), five atoms
/// total, one inter-group bond linking the two groups' backbones.
fn sample_structure() -> Structure {
    let mut s = Structure {
        num_models: 1,
        num_chains: 1,
        num_groups: 2,
        num_atoms: 5,
        num_bonds: 3 + 1, // 1 from alanine + 2 from water + 1 inter-group
        chains_per_model: vec![1],
        groups_per_chain: vec![2],
        group_type_list: vec![0, 1],
        group_id_list: vec![1, 2],
        chain_id_list: vec!["A".to_string()],
        x_coord_list: vec![1.0, 2.0, 3.0, 4.0, 5.0],
        y_coord_list: vec![1.5, 2.5, 3.5, 4.5, 5.5],
        z_coord_list: vec![0.1, 0.2, 0.3, 0.4, 0.5],
        b_factor_list: vec![10.0, 11.0, 12.0, 13.0, 14.0],
        occupancy_list: vec![1.0, 1.0, 1.0, 1.0, 1.0],
        group_list: vec![alanine_group(), water_group()],
        entity_list: vec![Entity {
            chain_indices: vec![0],
            description: "test polymer".to_string(),
            r#type: "polymer".to_string(),
            sequence: "A".to_string(),
        }],
        bio_assembly_list: vec![BioAssembly {
            name: "1".to_string(),
            transform_list: vec![Transform {
                chain_index_list: vec![0],
                matrix: {
                    let mut m = [0.0f32; 16];
                    m[0] = 1.0;
                    m[5] = 1.0;
                    m[10] = 1.0;
                    m[15] = 1.0;
                    m
                },
            }],
        }],
        bond_atom_list: vec![1, 2],
        bond_order_list: vec![1],
        sequence_index_list: vec![0, -1],
        ..Structure::default()
    };
    s.extra_properties = rmpv::Value::Map(vec![(
        "source".into(),
        rmpv::Value::String("integration-test".into()),
    )]);
    s
}

#[test]
fn full_structure_round_trips() {
    let original = sample_structure();
    let opts = EncodeOptions::default();
    let bytes = encode_to_buffer(&original, &opts).expect("valid structure should encode");
    let decoded = decode_from_buffer(&bytes).expect("encoded bytes should decode");

    assert_eq!(decoded.num_atoms, original.num_atoms);
    assert_eq!(decoded.num_bonds, original.num_bonds);
    assert_eq!(decoded.chain_id_list, original.chain_id_list);
    assert_eq!(decoded.group_list, original.group_list);
    assert_eq!(decoded.entity_list, original.entity_list);
    assert_eq!(decoded.bio_assembly_list, original.bio_assembly_list);
    assert_eq!(decoded.sequence_index_list, original.sequence_index_list);

    for (got, want) in decoded.x_coord_list.iter().zip(&original.x_coord_list) {
        assert!((got - want).abs() < 1e-3);
    }
    for (got, want) in decoded.b_factor_list.iter().zip(&original.b_factor_list) {
        assert!((got - want).abs() < 1e-2);
    }
}

#[test]
fn opaque_properties_survive_two_round_trips() {
    let original = sample_structure();
    let opts = EncodeOptions::default();

    let once = decode_from_buffer(&encode_to_buffer(&original, &opts).unwrap()).unwrap();
    let twice = decode_from_buffer(&encode_to_buffer(&once, &opts).unwrap()).unwrap();

    assert_eq!(twice.extra_properties, original.extra_properties);
}

#[test]
fn default_omission_drops_empty_optional_columns() {
    let original = sample_structure();
    let opts = EncodeOptions::default();
    let bytes = encode_to_buffer(&original, &opts).unwrap();

    let value = mmtf::map_decoder_from_buffer(&bytes).unwrap();
    // altLocList was never populated; the encoded map must not carry the key.
    assert!(!value.contains("altLocList"));
}

#[test]
fn missing_required_field_is_reported() {
    let map = rmpv::Value::Map(vec![("mmtfVersion".into(), "1.0".into())]);
    let mut bytes = Vec::new();
    rmpv::encode::write_value(&mut bytes, &map).unwrap();
    let err = decode_from_buffer(&bytes).unwrap_err();
    assert_eq!(err, Error::MissingField { key: "mmtfProducer" });
}

#[test]
fn wrong_type_field_is_reported() {
    let map = rmpv::Value::Map(vec![
        ("mmtfVersion".into(), "1.0".into()),
        ("mmtfProducer".into(), 42.into()),
    ]);
    let mut bytes = Vec::new();
    rmpv::encode::write_value(&mut bytes, &map).unwrap();
    let err = decode_from_buffer(&bytes).unwrap_err();
    assert_eq!(
        err,
        Error::TypeMismatch {
            key: "mmtfProducer",
            wanted: "string",
            got: "integer"
        }
    );
}

#[test]
fn validator_rejects_group_catalog_index_out_of_range() {
    let mut bad = sample_structure();
    bad.group_type_list = vec![0, 99];
    let opts = EncodeOptions::default();
    assert!(matches!(
        encode_to_buffer(&bad, &opts),
        Err(Error::IndexOutOfRange {
            field: "groupTypeList",
            ..
        })
    ));
}

#[test]
fn validator_rejects_bad_chain_count() {
    let mut bad = sample_structure();
    bad.num_chains = 2; // chainsPerModel/groupsPerChain still describe 1
    let opts = EncodeOptions::default();
    assert!(encode_to_buffer(&bad, &opts).is_err());
}
