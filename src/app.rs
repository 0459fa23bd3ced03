use ratatui::widgets::ListState;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::{self, ImageSummary, LayerSummary};
use crate::config::Config;
use crate::efficiency;
use crate::error::Result;
use crate::fetch::{Task, TaskResult};
use crate::hit::{self, HitZone, RegionHit};
use crate::layout::{LayoutEngine, RegionLayout, VisualRegion};
use crate::nav::NavigationStack;
use crate::theme::{self, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tab {
    Explorer,
    Layers,
    Efficiency,
}

/// The one directory fetch allowed to mutate the stack when it lands.
#[derive(Debug)]
struct PendingFetch {
    seq: u64,
    token: CancellationToken,
}

pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub active_tab: Tab,
    pub should_quit: bool,

    // Explorer state
    pub stack: NavigationStack,
    layout_engine: LayoutEngine,
    pub layout: Option<RegionLayout>,
    pub listing_cursor: usize,
    pub listing_state: ListState,
    pub hit_zones: Vec<HitZone>,
    /// Which file system the explorer shows: the image or one of its layers.
    pub explorer_source: String,

    // Image and layer summaries
    pub image_name: String,
    pub image: Option<ImageSummary>,
    pub layers: Vec<LayerSummary>,
    pub layer_cursor: usize,
    pub layer_state: ListState,

    // Fetch sequencing
    latest_seq: u64,
    pending_fetch: Option<PendingFetch>,

    // UI state
    pub status_message: String,
    pub is_loading: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            theme: theme::get_theme(),
            active_tab: Tab::Explorer,
            should_quit: false,

            stack: NavigationStack::new(),
            layout_engine: LayoutEngine::new(theme::REGION_PALETTE.len()),
            layout: None,
            listing_cursor: 0,
            listing_state: ListState::default(),
            hit_zones: Vec::new(),
            explorer_source: api::IMAGE_FILESYSTEM_NAME.to_string(),

            image_name: String::new(),
            image: None,
            layers: Vec::new(),
            layer_cursor: 0,
            layer_state: ListState::default(),

            latest_seq: 0,
            pending_fetch: None,

            status_message: "Ready".to_string(),
            is_loading: false,
        }
    }

    pub fn next_tab(&mut self) {
        self.active_tab = match self.active_tab {
            Tab::Explorer => Tab::Layers,
            Tab::Layers => Tab::Efficiency,
            Tab::Efficiency => Tab::Explorer,
        };
    }

    pub fn previous_tab(&mut self) {
        self.active_tab = match self.active_tab {
            Tab::Explorer => Tab::Efficiency,
            Tab::Layers => Tab::Explorer,
            Tab::Efficiency => Tab::Layers,
        };
    }

    /// Regions of the current directory, in display order. The listing and
    /// the proportional strip both present exactly this sequence.
    pub fn regions(&self) -> &[VisualRegion] {
        self.layout
            .as_ref()
            .map(|layout| layout.regions.as_slice())
            .unwrap_or(&[])
    }

    pub fn efficiency_score(&self) -> Option<Result<u32>> {
        self.image
            .as_ref()
            .map(|image| efficiency::score(&self.layers, image))
    }

    pub fn has_pending_fetch(&self) -> bool {
        self.pending_fetch.is_some()
    }

    /// Issue an asynchronous fetch for a directory id. The previous pending
    /// fetch, if any, is superseded: its token is cancelled and its result
    /// will be discarded on arrival.
    pub fn navigate_to(&mut self, id: i64, task_sender: &mpsc::Sender<Task>) {
        self.invalidate_pending();
        self.latest_seq += 1;
        let token = CancellationToken::new();
        self.pending_fetch = Some(PendingFetch {
            seq: self.latest_seq,
            token: token.clone(),
        });

        let task = Task::LoadDir {
            seq: self.latest_seq,
            id,
            token,
        };
        let sender = task_sender.clone();
        tokio::spawn(async move {
            if let Err(e) = sender.send(task).await {
                log::error!("Failed to send LoadDir task: {}", e);
            }
        });

        self.is_loading = true;
        self.status_message = format!("Loading directory {}...", id);
    }

    /// Pop one level without any fetch; the parent's subtree is already on
    /// the stack. Returns false at the file system root.
    pub fn navigate_up(&mut self) -> bool {
        if self.stack.pop() {
            // A fetch still in flight would push under the wrong parent
            self.invalidate_pending();
            self.rebuild_layout();
            self.status_message = "Moved up one level".to_string();
            true
        } else {
            self.status_message = "Already at the file system root".to_string();
            false
        }
    }

    /// Resolve a region hit; a directory triggers navigation, anything else
    /// is a no-op.
    pub fn select_region(&mut self, region_hit: RegionHit, task_sender: &mpsc::Sender<Task>) {
        let target = match (&self.layout, self.stack.current()) {
            (Some(layout), Some(current)) => {
                hit::resolve(layout, current, region_hit).map(|child| child.id)
            }
            _ => None,
        };
        if let Some(id) = target {
            self.navigate_to(id, task_sender);
        }
    }

    /// Treat the listing cursor like a click on the same region.
    pub fn select_under_cursor(&mut self, task_sender: &mpsc::Sender<Task>) {
        if let Some(generation) = self.layout.as_ref().map(|layout| layout.generation) {
            let region_hit = RegionHit {
                generation,
                child_index: self.listing_cursor,
            };
            self.select_region(region_hit, task_sender);
        }
    }

    /// Throw away the current path and start over at another root.
    pub fn open_filesystem(&mut self, root_id: i64, source: String, task_sender: &mpsc::Sender<Task>) {
        self.stack.clear();
        self.layout = None;
        self.hit_zones.clear();
        self.listing_cursor = 0;
        self.listing_state.select(None);
        self.explorer_source = source;
        self.navigate_to(root_id, task_sender);
    }

    pub fn open_image_filesystem(&mut self, task_sender: &mpsc::Sender<Task>) -> bool {
        match self.image {
            Some(image) => {
                self.open_filesystem(
                    image.root_directory_id,
                    api::IMAGE_FILESYSTEM_NAME.to_string(),
                    task_sender,
                );
                true
            }
            None => {
                self.status_message = "Image summary not loaded yet".to_string();
                false
            }
        }
    }

    pub fn open_selected_layer(&mut self, task_sender: &mpsc::Sender<Task>) -> bool {
        let root_id = match self.layers.get(self.layer_cursor) {
            Some(layer) => layer.root_directory_id,
            None => return false,
        };
        let source = format!("layer {}", self.layer_cursor + 1);
        self.active_tab = Tab::Explorer;
        self.open_filesystem(root_id, source, task_sender);
        true
    }

    /// The single mutation point for async results. Anything tagged with a
    /// superseded sequence number is discarded without touching the stack.
    pub fn apply_task_result(&mut self, result: TaskResult, task_sender: &mpsc::Sender<Task>) {
        match result {
            TaskResult::ImageNameLoaded { name } => {
                self.image_name = name;
            }
            TaskResult::FilesystemsLoaded { filesystems } => {
                match api::partition_filesystems(filesystems) {
                    Ok((image, mut layers)) => {
                        api::sort_layers(&mut layers, self.config.layer_order);
                        let root_id = image.root_directory_id;
                        self.image = Some(image);
                        self.layers = layers;
                        self.layer_cursor = 0;
                        self.layer_state
                            .select(if self.layers.is_empty() { None } else { Some(0) });
                        self.status_message = format!("Loaded {} layers", self.layers.len());
                        // Open the merged image right away
                        self.open_filesystem(
                            root_id,
                            api::IMAGE_FILESYSTEM_NAME.to_string(),
                            task_sender,
                        );
                    }
                    Err(e) => {
                        self.status_message = format!("Load failed: {}", e);
                    }
                }
            }
            TaskResult::DirLoaded { seq, node } => {
                // Race condition protection: only the fetch issued last may
                // mutate the stack
                if !self.is_current_seq(seq) {
                    log::debug!("Ignoring directory result with stale seq {}", seq);
                    return;
                }
                self.pending_fetch = None;
                self.is_loading = false;
                let entries = node.children.len();
                self.stack.push(node);
                self.rebuild_layout();
                self.status_message = format!("Loaded {} entries", entries);
            }
            TaskResult::DirCancelled { seq } => {
                log::debug!("Directory fetch with seq {} was cancelled", seq);
            }
            TaskResult::DirFailed { seq, message } => {
                if !self.is_current_seq(seq) {
                    log::debug!("Ignoring failure with stale seq {}", seq);
                    return;
                }
                self.pending_fetch = None;
                self.is_loading = false;
                // Stack and layout stay as they were; the user may retry
                self.status_message = format!("Load failed: {}", message);
            }
            TaskResult::Error { message } => {
                self.status_message = format!("Load failed: {}", message);
            }
        }
    }

    pub fn move_listing_up(&mut self) -> bool {
        if self.listing_cursor == 0 {
            return false;
        }
        self.listing_cursor -= 1;
        self.listing_state.select(Some(self.listing_cursor));
        true
    }

    pub fn move_listing_down(&mut self) -> bool {
        let len = self.regions().len();
        if len == 0 || self.listing_cursor >= len - 1 {
            return false;
        }
        self.listing_cursor += 1;
        self.listing_state.select(Some(self.listing_cursor));
        true
    }

    pub fn move_layer_up(&mut self) -> bool {
        if self.layer_cursor == 0 {
            return false;
        }
        self.layer_cursor -= 1;
        self.layer_state.select(Some(self.layer_cursor));
        true
    }

    pub fn move_layer_down(&mut self) -> bool {
        if self.layers.is_empty() || self.layer_cursor >= self.layers.len() - 1 {
            return false;
        }
        self.layer_cursor += 1;
        self.layer_state.select(Some(self.layer_cursor));
        true
    }

    fn is_current_seq(&self, seq: u64) -> bool {
        self.pending_fetch
            .as_ref()
            .map(|pending| pending.seq == seq)
            .unwrap_or(false)
    }

    fn invalidate_pending(&mut self) {
        if let Some(pending) = self.pending_fetch.take() {
            pending.token.cancel();
        }
        self.is_loading = false;
    }

    fn rebuild_layout(&mut self) {
        self.hit_zones.clear();
        self.listing_cursor = 0;
        match self.stack.current() {
            Some(current) => {
                let layout = self.layout_engine.rebuild(current);
                let select = if layout.regions.is_empty() { None } else { Some(0) };
                self.layout = Some(layout);
                self.listing_state.select(select);
            }
            None => {
                self.layout = None;
                self.listing_state.select(None);
            }
        }
    }
}
