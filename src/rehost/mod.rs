use std::collections::HashSet;
use std::path::PathBuf;

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use spdlog::info;

use crate::error::{PostError, Result};

pub mod convert;

pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Where images are downloaded from.
pub trait ImageSource {
    fn fetch(&self, url: &str) -> Result<FetchedImage>;
}

/// A platform's asset store. Returns the hosted URL of the uploaded JPEG.
pub trait ImageStore {
    fn upload(&self, file_name: &str, jpeg: Vec<u8>) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownImage {
    pub markdown: String,
    pub alt: String,
    pub url: String,
}

pub struct HttpImageSource {
    client: Client,
}

impl HttpImageSource {
    pub fn new(client: Client) -> Self {
        HttpImageSource { client }
    }
}

impl ImageSource for HttpImageSource {
    fn fetch(&self, url: &str) -> Result<FetchedImage> {
        let download_err = |reason: String| PostError::ImageDownload { url: url.to_string(), reason };

        let response = self.client.get(url)
            .send()
            .map_err(|e| download_err(e.to_string()))?;
        if !response.status().is_success() {
            return Err(download_err(format!("server answered {}", response.status())));
        }

        let content_type = response.headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let bytes = response.bytes().map_err(|e| download_err(e.to_string()))?;

        Ok(FetchedImage { bytes: bytes.to_vec(), content_type })
    }
}

pub fn find_all_images(content: &str) -> Vec<MarkdownImage> {
    lazy_static! {
        static ref MD_IMAGE_REGEX: Regex = Regex::new(r"!\[(.*?)\]\((https?://[^\s)]+)\)").unwrap();
    }

    MD_IMAGE_REGEX.captures_iter(content)
        .map(|cap| MarkdownImage {
            markdown: cap[0].to_string(),
            alt: cap[1].to_string(),
            url: cap[2].to_string(),
        })
        .collect()
}

pub fn img_tag(hosted_url: &str, alt: &str) -> String {
    format!(r#"<img src="{}" alt="{}">"#, hosted_url, alt.replace('"', "&quot;"))
}

/// Last path segment of the URL, reduced to characters that are safe in a file name.
pub fn file_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    let name: String = last.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
        .collect();

    match name.trim_matches('.') {
        "" => "image".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Moves every markdown image of a body to a platform's own asset store.
pub struct ImageRehoster<'a> {
    source: &'a dyn ImageSource,
    store: &'a dyn ImageStore,
    work_root: Option<PathBuf>,
}

impl<'a> ImageRehoster<'a> {
    pub fn new(source: &'a dyn ImageSource, store: &'a dyn ImageStore) -> Self {
        ImageRehoster { source, store, work_root: None }
    }

    /// Parent directory for the per-image scratch directories. Defaults to the system temp dir.
    pub fn with_work_root(mut self, work_root: PathBuf) -> Self {
        self.work_root = Some(work_root);
        self
    }

    /// Replaces each `![alt](https://...)` with an `<img>` tag pointing at the hosted copy.
    pub fn rehost(&self, content: &str) -> Result<String> {
        let mut content = content.to_string();
        let mut seen = HashSet::new();

        for image in find_all_images(&content) {
            if !seen.insert(image.markdown.clone()) {
                continue;
            }
            let hosted_url = self.rehost_image(&image.url)?;
            info!("Rehosted {} as {}", image.url, hosted_url);
            content = content.replace(&image.markdown, &img_tag(&hosted_url, &image.alt));
        }

        Ok(content)
    }

    fn rehost_image(&self, url: &str) -> Result<String> {
        let fetched = self.source.fetch(url)?;
        let file_name = file_name_from_url(url);

        // dropped at the end of this call, taking every intermediate file with it
        let work_dir = match self.work_root {
            Some(ref root) => tempfile::Builder::new().prefix("crosspost-").tempdir_in(root)?,
            None => tempfile::Builder::new().prefix("crosspost-").tempdir()?,
        };

        let jpeg = convert::convert_to_jpeg(work_dir.path(), &file_name, &fetched)?;
        let stem = file_name.rsplit_once('.').map_or(file_name.as_str(), |(stem, _)| stem);
        self.store.upload(&format!("{}.jpeg", stem), jpeg)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;

    use crate::test_data::{png_bytes, serve_once, SVG_DATA};

    use super::*;

    pub struct FakeSource {
        images: HashMap<String, FetchedImage>,
        fetched: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn new() -> Self {
            let mut images = HashMap::new();
            images.insert("https://x.com/a.png".to_string(), FetchedImage { bytes: png_bytes(), content_type: Some("image/png".to_string()) });
            images.insert("https://x.com/d.svg?v=2".to_string(), FetchedImage { bytes: SVG_DATA.as_bytes().to_vec(), content_type: Some("image/svg+xml".to_string()) });
            images.insert("https://x.com/broken.png".to_string(), FetchedImage { bytes: b"garbage".to_vec(), content_type: Some("image/png".to_string()) });
            FakeSource { images, fetched: RefCell::new(vec![]) }
        }
    }

    impl ImageSource for FakeSource {
        fn fetch(&self, url: &str) -> Result<FetchedImage> {
            self.fetched.borrow_mut().push(url.to_string());
            match self.images.get(url) {
                Some(img) => Ok(FetchedImage { bytes: img.bytes.clone(), content_type: img.content_type.clone() }),
                None => Err(PostError::ImageDownload { url: url.to_string(), reason: "404 Not Found".to_string() }),
            }
        }
    }

    #[derive(Default)]
    pub struct FakeStore {
        uploads: RefCell<Vec<String>>,
    }

    impl ImageStore for FakeStore {
        fn upload(&self, file_name: &str, jpeg: Vec<u8>) -> Result<String> {
            assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
            self.uploads.borrow_mut().push(file_name.to_string());
            Ok(format!("https://cdn.host/{}", file_name))
        }
    }

    #[test]
    fn test_http_source_rejects_error_status() {
        let url = format!("{}/img/missing.png", serve_once("404 Not Found"));
        let source = HttpImageSource::new(Client::new());

        match source.fetch(&url) {
            Err(PostError::ImageDownload { url: failed, reason }) => {
                assert_eq!(failed, url);
                assert!(reason.contains("404"), "{}", reason);
            }
            Err(other) => panic!("unexpected error {}", other),
            Ok(_) => panic!("a 404 must not be treated as an image"),
        }
    }

    #[test]
    fn test_find_all_images() {
        let images = find_all_images("![one](https://x.com/a.png) text ![](http://x.com/b.jpg) ![local](c.png)");
        assert_eq!(images.len(), 2);
        assert_eq!(images[0], MarkdownImage {
            markdown: "![one](https://x.com/a.png)".to_string(),
            alt: "one".to_string(),
            url: "https://x.com/a.png".to_string(),
        });
        assert_eq!(images[1].alt, "");
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(file_name_from_url("https://x.com/img/cover.png"), "cover.png");
        assert_eq!(file_name_from_url("https://x.com/d.svg?v=2"), "d.svg");
        assert_eq!(file_name_from_url("https://x.com/a%20b.png"), "a_20b.png");
        assert_eq!(file_name_from_url("https://x.com/"), "x.com");
        assert_eq!(file_name_from_url("https://x.com/.."), "image");
    }

    #[test]
    fn test_rehost() {
        let source = FakeSource::new();
        let store = FakeStore::default();
        let root = tempfile::tempdir().unwrap();
        let rehoster = ImageRehoster::new(&source, &store).with_work_root(root.path().to_path_buf());

        let content = "Intro\n![a \"quoted\" cat](https://x.com/a.png)\n\n![diagram](https://x.com/d.svg?v=2)\nagain ![a \"quoted\" cat](https://x.com/a.png)";
        let res = rehoster.rehost(content).unwrap();

        assert_eq!(res, "Intro\n<img src=\"https://cdn.host/a.jpeg\" alt=\"a &quot;quoted&quot; cat\">\n\n<img src=\"https://cdn.host/d.jpeg\" alt=\"diagram\">\nagain <img src=\"https://cdn.host/a.jpeg\" alt=\"a &quot;quoted&quot; cat\">");
        assert_eq!(*store.uploads.borrow(), ["a.jpeg", "d.jpeg"]);
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);

        // nothing left to rehost on a second pass
        let again = rehoster.rehost(&res).unwrap();
        assert_eq!(again, res);
        assert_eq!(source.fetched.borrow().len(), 2);
    }

    #[test]
    fn test_rehost_failure_cleans_up() {
        let source = FakeSource::new();
        let store = FakeStore::default();
        let root = tempfile::tempdir().unwrap();
        let rehoster = ImageRehoster::new(&source, &store).with_work_root(root.path().to_path_buf());

        let err = rehoster.rehost("![b](https://x.com/broken.png)").unwrap_err();
        assert!(matches!(err, PostError::ImageConversion { .. }));
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);

        let err = rehoster.rehost("![m](https://x.com/missing.png)").unwrap_err();
        assert!(matches!(err, PostError::ImageDownload { .. }));
        assert!(store.uploads.borrow().is_empty());
    }
}
