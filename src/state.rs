use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::infrastructure::ffmpeg::Ffmpeg;
use crate::infrastructure::storage::JobStorage;
use crate::workers::cleanup::CleanupScheduler;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: JobStorage,
    pub ffmpeg: Ffmpeg,
    pub cleanup: CleanupScheduler,
}

impl AppState {
    pub fn new(config: AppConfig, cleanup: CleanupScheduler) -> Self {
        let storage = JobStorage::new(&config.tmp_dir, &config.jobs_dir);
        let ffmpeg = Ffmpeg::new(&config.ffmpeg_path);

        Self {
            config: Arc::new(config),
            storage,
            ffmpeg,
            cleanup,
        }
    }
}
