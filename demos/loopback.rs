//! In-memory loopback: serialize telemetry on one side, feed the parser in
//! small chunks on the other, sample the pool. Swap the channel for a serial
//! port read loop to talk to real hardware.

use bytemuck::{Pod, Zeroable};
use rovlink::{frame_size, packet_set, MemoryPool, Packet, PacketSet, Parser, Serializer};

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Attitude {
    roll: f32,
    pitch: f32,
    yaw: f32,
}

impl Packet for Attitude {
    const CMD: u16 = 0x0201;
}

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct BatteryStatus {
    millivolts: u16,
    percent: u8,
}

impl Packet for BatteryStatus {
    const CMD: u16 = 0x0202;
}

packet_set! {
    struct VehicleLink {
        Attitude,
        BatteryStatus,
    }
}

fn main() {
    let mut serializer = Serializer::<VehicleLink>::new();
    let mut parser: Parser<VehicleLink, { VehicleLink::POOL_SIZE }, { VehicleLink::RING_SIZE }> =
        Parser::new(MemoryPool::new());

    let mut wire = [0u8; frame_size::<Attitude>() + frame_size::<BatteryStatus>()];

    for step in 0u32..10 {
        let attitude = Attitude {
            roll: 0.01 * step as f32,
            pitch: -0.02 * step as f32,
            yaw: 1.57,
        };
        let battery = BatteryStatus {
            millivolts: 12600 - 35 * step as u16,
            percent: (100 - 3 * step) as u8,
        };

        let written = serializer
            .serialize_many(&mut wire, &(attitude, battery))
            .expect("wire buffer sized for both frames");

        // A serial port hands us arbitrary chunks; seven bytes at a time is
        // as hostile as it gets.
        for chunk in wire[..written].chunks(7) {
            parser.push(chunk).expect("ring buffer cannot overflow here");
        }

        let att = parser.read::<Attitude>();
        let bat = parser.read::<BatteryStatus>();
        let (roll, pitch) = (att.roll, att.pitch);
        let (mv, pct) = (bat.millivolts, bat.percent);
        println!("step {step}: roll={roll:.3} pitch={pitch:.3} battery={mv}mV ({pct}%)");
    }

    let stats = parser.stats();
    println!(
        "frames committed: {}, bytes skipped: {}",
        stats.frames_committed, stats.bytes_skipped
    );
}
