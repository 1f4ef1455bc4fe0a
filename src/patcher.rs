/// Page region replacement
///
/// A region is the inner content of a container `<div class="...">` that is
/// closed right before a section boundary comment:
///
/// ```text
/// <div class="video-carousel">
///   ...cards...
/// </div>
/// </div>
/// </section>
/// <!-- ========== EDITOR ...
/// ```
///
/// Only the span between the opening tag and the closing sequence is rewritten.
/// The splice is textual so every byte outside the region is kept as-is; the
/// parsed document is only consulted to explain why a region could not be found.
use crate::error::PatchError;
use regex::{Captures, Regex};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Anchors locating one replaceable region of the page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Region {
    /// Name used in logs and reports
    pub name: String,

    /// Class attribute of the container `div`
    pub container_class: String,

    /// Label of the section boundary comment following the region
    pub boundary_label: String,
}

impl Region {
    pub fn new(name: &str, container_class: &str, boundary_label: &str) -> Self {
        Self {
            name: name.to_string(),
            container_class: container_class.to_string(),
            boundary_label: boundary_label.to_string(),
        }
    }

    fn opening_tag(&self) -> String {
        format!(r#"<div\s+class="{}"\s*>"#, regex::escape(&self.container_class))
    }

    fn pattern(&self) -> Result<Regex, PatchError> {
        let pattern = format!(
            r#"(?s)(?P<open>{open})(?P<inner>.*?)(?P<close></div>\s*</div>\s*</section>\s*<!--\s*=+\s*{label})"#,
            open = self.opening_tag(),
            label = regex::escape(&self.boundary_label),
        );
        Regex::new(&pattern).map_err(|source| PatchError::Anchor {
            region: self.name.clone(),
            source,
        })
    }

    /// Explain a failed match by looking for the container in the parsed document
    fn diagnose(&self, page: &str) -> String {
        let selector = match Selector::parse(&format!("div.{}", self.container_class)) {
            Ok(selector) => selector,
            Err(e) => return format!("container class '{}' is not a valid selector: {:?}", self.container_class, e),
        };

        let document = Html::parse_document(page);
        let exact_open = Regex::new(&self.opening_tag()).map_or(false, |re| re.is_match(page));

        match document.select(&selector).count() {
            0 => format!("no <div class=\"{}\"> container in page", self.container_class),
            _ if !exact_open => format!(
                "container with class '{}' found but its opening tag is not exactly <div class=\"{}\"> (extra classes or attributes)",
                self.container_class, self.container_class
            ),
            _ => format!(
                "container <div class=\"{}\"> found but not followed by the '{}' section boundary",
                self.container_class, self.boundary_label
            ),
        }
    }
}

/// What happened to a region during a patch
#[derive(Debug, Clone, PartialEq)]
pub enum RegionOutcome {
    Replaced,
    Missing { reason: String },
}

/// Per-region outcomes of a patch, in request order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchReport {
    pub regions: Vec<(String, RegionOutcome)>,
}

impl PatchReport {
    pub fn all_replaced(&self) -> bool {
        self.regions
            .iter()
            .all(|(_, outcome)| *outcome == RegionOutcome::Replaced)
    }

    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.regions
            .iter()
            .filter(|(_, outcome)| *outcome != RegionOutcome::Replaced)
            .map(|(name, _)| name.as_str())
    }
}

/// Replaces region contents in a page document
#[derive(Debug, Clone, Copy, Default)]
pub struct PagePatcher {
    strict: bool,
}

impl PagePatcher {
    /// In strict mode a missing region is an error, otherwise a warning
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Replace the inner content of one region. The page is returned unchanged
    /// when the region is missing and the patcher is not strict.
    pub fn patch_region(&self, page: &str, region: &Region, fragment: &str) -> Result<(String, RegionOutcome), PatchError> {
        let pattern = region.pattern()?;

        if !pattern.is_match(page) {
            let reason = region.diagnose(page);
            if self.strict {
                return Err(PatchError::RegionNotFound {
                    region: region.name.clone(),
                    reason,
                });
            }
            warn!("⚠️ Region '{}' left unchanged: {}", region.name, reason);
            return Ok((page.to_string(), RegionOutcome::Missing { reason }));
        }

        let inner = if fragment.is_empty() {
            "\n    ".to_string()
        } else {
            format!("\n{}\n    ", fragment)
        };

        let patched = pattern.replacen(page, 1, |caps: &Captures| {
            format!("{}{}{}", &caps["open"], inner, &caps["close"])
        });

        debug!("Replaced region '{}'", region.name);
        Ok((patched.into_owned(), RegionOutcome::Replaced))
    }

    /// Apply several region replacements in order
    pub fn patch(&self, page: &str, replacements: &[(&Region, &str)]) -> Result<(String, PatchReport), PatchError> {
        let mut current = page.to_string();
        let mut report = PatchReport::default();

        for (region, fragment) in replacements {
            let (next, outcome) = self.patch_region(&current, region, fragment)?;
            current = next;
            report.regions.push((region.name.clone(), outcome));
        }

        Ok((current, report))
    }
}
