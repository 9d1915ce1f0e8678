#![no_main]
use libfuzzer_sys::fuzz_target;
use pblocks_assign::{assign_protein_blocks, ReferenceLibrary};
use pblocks_core::{AngleMap, PhiPsi};

fuzz_target!(|data: &str| {
    if let Ok(library) = ReferenceLibrary::parse(data) {
        let angles: AngleMap = (1..=6).map(|i| (i, PhiPsi::new(-60.0, -45.0))).collect();
        let pbs = assign_protein_blocks(&library, &angles);
        assert_eq!(pbs.as_str().chars().count(), 6);
    }
});
