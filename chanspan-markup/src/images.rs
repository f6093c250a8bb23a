//! Image extraction from a parsed post.
use crate::post::{PostBuilder, PostImage};

/// Extensions treated as directly linked images.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Adds images to a post once its comment has been parsed.
pub trait ImageExtractor: Send + Sync {
  fn add_post_images(&self, post: &mut PostBuilder);
}

/// Turns links to image files found in the comment into post images.
#[derive(Debug, Clone, Copy)]
pub struct LinkedImageExtractor {
  enabled: bool,
}

impl LinkedImageExtractor {
  #[must_use]
  pub const fn new(enabled: bool) -> Self {
    Self { enabled }
  }
}

impl Default for LinkedImageExtractor {
  fn default() -> Self {
    Self::new(true)
  }
}

impl ImageExtractor for LinkedImageExtractor {
  fn add_post_images(&self, post: &mut PostBuilder) {
    if !self.enabled {
      return;
    }

    let found: Vec<PostImage> =
      post.links.iter().filter_map(|url| image_from_url(url)).collect();

    for image in found {
      if post.images.iter().any(|known| known.url == image.url) {
        continue;
      }
      log::debug!(
        "Adding linked image {} to post /{}/{}",
        image.url,
        post.board,
        post.no
      );
      post.images.push(image);
    }
  }
}

/// Build an image from a URL whose path ends in an image extension.
#[must_use]
pub fn image_from_url(url: &str) -> Option<PostImage> {
  let (_, rest) = url.split_once("://")?;
  let path = rest.split(['?', '#']).next()?;
  let (_, file) = path.rsplit_once('/')?;
  let (filename, extension) = file.rsplit_once('.')?;
  let extension = extension.to_ascii_lowercase();

  (!filename.is_empty() && IMAGE_EXTENSIONS.contains(&extension.as_str()))
    .then(|| {
      PostImage {
        url: url.to_string(),
        filename: filename.to_string(),
        extension,
      }
    })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_image_from_url() {
    let image = image_from_url("https://i.example.com/g/1700000000.PNG?x=1");
    assert_eq!(
      image,
      Some(PostImage {
        url:       "https://i.example.com/g/1700000000.PNG?x=1".to_string(),
        filename:  "1700000000".to_string(),
        extension: "png".to_string(),
      })
    );
    assert_eq!(image_from_url("https://example.com/page.html"), None);
    assert_eq!(image_from_url("https://example.com"), None);
    assert_eq!(image_from_url("https://example.com/.png"), None);
  }

  #[test]
  fn test_extractor_dedups_and_respects_toggle() {
    let mut post = PostBuilder::new("g", 1);
    post.add_link("https://example.com/a.gif");
    post.add_link("https://example.com/b.txt");
    post.images.push(PostImage {
      url:       "https://example.com/a.gif".to_string(),
      filename:  "a".to_string(),
      extension: "gif".to_string(),
    });

    LinkedImageExtractor::new(false).add_post_images(&mut post);
    assert_eq!(post.images.len(), 1);

    post.add_link("https://example.com/c.webp");
    LinkedImageExtractor::default().add_post_images(&mut post);
    let names: Vec<&str> =
      post.images.iter().map(|i| i.filename.as_str()).collect();
    assert_eq!(names, vec!["a", "c"]);
  }
}
