use std::fmt::Write;

use bytesize::ByteSize;
use voxel_stream::world_stats::WorldStatistics;

pub fn format_world_statistics(stats: &WorldStatistics) -> String {
    let mut report = String::new();

    let _ = write!(
        report,
        "chunks: {} ({} active)",
        stats.total_chunks, stats.active_chunks
    );

    for (state, count) in stats.chunks_by_state.iter() {
        if count > 0 {
            let _ = write!(report, ", {:?}: {}", state, count);
        }
    }

    let _ = write!(
        report,
        " | queues: {} streaming, {} batch, {} edits, {} raycasts",
        stats.streaming_queue, stats.batch_queue, stats.queued_edits, stats.queued_raycasts
    );

    let _ = write!(
        report,
        " | jobs: {}/{}{}",
        stats.jobs_completed,
        stats.jobs_launched,
        if stats.job_in_flight { " (running)" } else { "" }
    );

    let volume = match stats.approximate_volume_bytes {
        Some(bytes) => ByteSize(bytes as u64).to_string(),
        None => "lent out".to_string(),
    };
    let _ = write!(
        report,
        " | volume: {}, meshes: {}",
        volume,
        ByteSize(stats.approximate_mesh_bytes as u64)
    );

    report
}
