use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::LayerOrder;
use crate::error::{LayerscopeError, Result};
use crate::tree::DirNode;

/// The filesystems entry holding the merged image; every other entry is a
/// layer.
pub const IMAGE_FILESYSTEM_NAME: &str = "image";

#[derive(Debug, Clone, Deserialize)]
pub struct NameDto {
    #[serde(rename = "imageName")]
    pub image_name: String,
}

/// One row of `GET /filesystems`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilesystemDto {
    pub name: String,
    pub root_directory_id: i64,
    pub command: String,
    pub size: u64,
}

/// Recursive payload of `GET /dirData`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DirDataDto {
    pub id: i64,
    pub is_dir: bool,
    pub name: String,
    pub size: u64,
    // Plain files arrive with Files missing or null
    #[serde(default)]
    pub files: Option<Vec<DirDataDto>>,
}

impl From<DirDataDto> for DirNode {
    fn from(dto: DirDataDto) -> Self {
        DirNode {
            id: dto.id,
            name: dto.name,
            is_dir: dto.is_dir,
            size: dto.size,
            children: dto
                .files
                .unwrap_or_default()
                .into_iter()
                .map(DirNode::from)
                .collect(),
        }
    }
}

/// One image-build step's contributed file-system delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSummary {
    pub root_directory_id: i64,
    /// Originating build instruction, opaque here.
    pub command: String,
    pub size: u64,
}

/// The fully merged file system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSummary {
    pub root_directory_id: i64,
    pub total_size: u64,
}

/// Split a filesystems response into the merged image and its layers.
///
/// The backend promises exactly one "image" entry; if it sends several the
/// last one wins, and none at all is a malformed response.
pub fn partition_filesystems(
    filesystems: Vec<FilesystemDto>,
) -> Result<(ImageSummary, Vec<LayerSummary>)> {
    let mut image = None;
    let mut layers = Vec::new();

    for fs in filesystems {
        if fs.name == IMAGE_FILESYSTEM_NAME {
            image = Some(ImageSummary {
                root_directory_id: fs.root_directory_id,
                total_size: fs.size,
            });
        } else {
            layers.push(LayerSummary {
                root_directory_id: fs.root_directory_id,
                command: fs.command,
                size: fs.size,
            });
        }
    }

    match image {
        Some(image) => Ok((image, layers)),
        None => Err(LayerscopeError::MalformedResponse(
            "no \"image\" entry in filesystems response".to_string(),
        )),
    }
}

/// Order layers for display by their root directory id.
pub fn sort_layers(layers: &mut [LayerSummary], order: LayerOrder) {
    match order {
        LayerOrder::Ascending => {
            layers.sort_by_key(|layer| layer.root_directory_id);
        }
        LayerOrder::Descending => {
            layers.sort_by_key(|layer| std::cmp::Reverse(layer.root_directory_id));
        }
    }
}

/// The backend this explorer talks to. Implemented over HTTP in production
/// and by scripted fakes in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn fetch_name(&self) -> Result<String>;
    async fn fetch_filesystems(&self) -> Result<Vec<FilesystemDto>>;
    async fn fetch_dir(&self, id: i64) -> Result<DirNode>;
}

/// reqwest-backed client for the three backend routes.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(LayerscopeError::UnexpectedStatus {
                url,
                status: response.status().as_u16(),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ImageBackend for HttpBackend {
    async fn fetch_name(&self) -> Result<String> {
        let name: NameDto = self.get_json("/name").await?;
        Ok(name.image_name)
    }

    async fn fetch_filesystems(&self) -> Result<Vec<FilesystemDto>> {
        self.get_json("/filesystems").await
    }

    async fn fetch_dir(&self, id: i64) -> Result<DirNode> {
        let data: DirDataDto = self.get_json(&format!("/dirData?id={}", id)).await?;
        Ok(data.into())
    }
}
