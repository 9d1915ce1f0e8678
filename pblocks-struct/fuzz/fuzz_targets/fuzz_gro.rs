#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(frames) = pblocks_struct::parse_gro(data) else {
        return;
    };
    if let Some(first) = frames.first() {
        let topology = pblocks_struct::Topology::from_frame(first);
        for frame in &frames {
            let _ = topology.chain_from_positions(&frame.positions());
        }
    }
});
