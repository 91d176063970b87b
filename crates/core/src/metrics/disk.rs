use crate::{
    error::{CoreError, Result},
    metrics::memory::percent_of,
    model::DiskUsage,
};
use std::path::{Path, PathBuf};
use sysinfo::Disks;

pub struct DiskCollector {
    disks: Disks,
}

impl DiskCollector {
    pub fn new() -> Result<Self> {
        let disks = Disks::new_with_refreshed_list();

        Ok(Self { disks })
    }

    /// Usage of the filesystem that holds `path`
    pub fn usage(&mut self, path: &Path) -> Result<DiskUsage> {
        let resolved = path.canonicalize().map_err(|e| {
            CoreError::sensor_unavailable(format!("disk path {}: {}", path.display(), e))
        })?;

        self.disks.refresh_list();

        let mounts: Vec<(PathBuf, u64, u64)> = self
            .disks
            .list()
            .iter()
            .map(|disk| {
                (
                    disk.mount_point().to_path_buf(),
                    disk.total_space(),
                    disk.available_space(),
                )
            })
            .collect();

        let (mount_point, total, available) = best_mount(&resolved, &mounts).ok_or_else(|| {
            CoreError::sensor_unavailable(format!(
                "no mounted filesystem contains {}",
                resolved.display()
            ))
        })?;

        if total == 0 {
            return Err(CoreError::sensor_unavailable(format!(
                "{} reports zero capacity",
                mount_point.display()
            )));
        }
        let used = total.saturating_sub(available);

        Ok(DiskUsage {
            path: path.to_path_buf(),
            mount_point,
            total,
            used,
            percent: percent_of(used, total),
        })
    }
}

/// The mount point with the longest prefix of `path`
fn best_mount(path: &Path, mounts: &[(PathBuf, u64, u64)]) -> Option<(PathBuf, u64, u64)> {
    mounts
        .iter()
        .filter(|(mount_point, _, _)| path.starts_with(mount_point))
        .max_by_key(|(mount_point, _, _)| mount_point.components().count())
        .cloned()
}
