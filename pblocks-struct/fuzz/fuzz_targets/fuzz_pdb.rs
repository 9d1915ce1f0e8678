#![no_main]
use libfuzzer_sys::fuzz_target;
use pblocks_core::DihedralSource;

fuzz_target!(|data: &str| {
    if let Ok(structure) = pblocks_struct::parse_pdb(data) {
        for chain in &structure.chains {
            let _ = chain.angle_map();
        }
    }
    let _ = pblocks_struct::parse_mmcif(data);
});
