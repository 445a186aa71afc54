//! `maven-metadata-local.xml` descriptors.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::Serialize;

/// Filename of the per-artifact metadata descriptor in the local store.
pub const METADATA_FILENAME: &str = "maven-metadata-local.xml";

/// Versioning record kept next to every installed artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    pub group_id: String,
    pub artifact_id: String,
    pub latest: Option<String>,
    pub release: Option<String>,
    pub versions: Vec<String>,
    pub last_updated: Option<String>,
}

fn xml_error(err: impl std::fmt::Display) -> StoreError {
    StoreError::Metadata(err.to_string())
}

impl ArtifactMetadata {
    pub fn new(group_id: &str, artifact_id: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            latest: None,
            release: None,
            versions: Vec::new(),
            last_updated: None,
        }
    }

    /// Record a freshly installed version.
    pub fn record_install(&mut self, version: &str, at: DateTime<Utc>) {
        if !self.versions.iter().any(|v| v == version) {
            self.versions.push(version.to_string());
        }
        self.latest = Some(version.to_string());
        self.release = Some(version.to_string());
        self.last_updated = Some(at.format("%Y%m%d%H%M%S").to_string());
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, StoreError> {
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().trim_text(true);

        let mut metadata = Self::new("", "");
        let mut path: Vec<String> = Vec::new();
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf).map_err(xml_error)? {
                Event::Start(start) => {
                    path.push(String::from_utf8_lossy(start.name().as_ref()).into_owned());
                }
                Event::End(_) => {
                    path.pop();
                }
                Event::Text(text) => {
                    let value = text.unescape().map_err(xml_error)?.into_owned();
                    let path: Vec<&str> = path.iter().map(String::as_str).collect();
                    match path.as_slice() {
                        ["metadata", "groupId"] => metadata.group_id = value,
                        ["metadata", "artifactId"] => metadata.artifact_id = value,
                        ["metadata", "versioning", "latest"] => metadata.latest = Some(value),
                        ["metadata", "versioning", "release"] => metadata.release = Some(value),
                        ["metadata", "versioning", "versions", "version"] => {
                            metadata.versions.push(value)
                        }
                        ["metadata", "versioning", "lastUpdated"] => {
                            metadata.last_updated = Some(value)
                        }
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if metadata.group_id.is_empty() || metadata.artifact_id.is_empty() {
            return Err(StoreError::Metadata(
                "descriptor is missing groupId or artifactId".to_string(),
            ));
        }
        Ok(metadata)
    }

    pub fn to_xml(&self) -> Result<Vec<u8>, StoreError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;
        open(&mut writer, "metadata")?;
        element(&mut writer, "groupId", &self.group_id)?;
        element(&mut writer, "artifactId", &self.artifact_id)?;
        open(&mut writer, "versioning")?;
        if let Some(latest) = &self.latest {
            element(&mut writer, "latest", latest)?;
        }
        if let Some(release) = &self.release {
            element(&mut writer, "release", release)?;
        }
        open(&mut writer, "versions")?;
        for version in &self.versions {
            element(&mut writer, "version", version)?;
        }
        close(&mut writer, "versions")?;
        if let Some(last_updated) = &self.last_updated {
            element(&mut writer, "lastUpdated", last_updated)?;
        }
        close(&mut writer, "versioning")?;
        close(&mut writer, "metadata")?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }
}

fn open(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), StoreError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)
}

fn close(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), StoreError> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)
}

fn element(writer: &mut Writer<Vec<u8>>, name: &str, value: &str) -> Result<(), StoreError> {
    open(writer, name)?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(xml_error)?;
    close(writer, name)
}
