//! Page placement for the visual snapshot document.
//!
//! Two captured regions go onto fixed-size pages, each scaled to the content
//! width. The metrics region starts at the top of the first page. The charts
//! region follows directly below it when it fits in what is left of that
//! page, otherwise it starts a new page. A region taller than a page carries
//! on over the following pages.

use crate::errors::{DashboardError, DashboardResult};
use serde::{Deserialize, Serialize};

/// Vertical space between the two regions, in page units.
pub const REGION_GAP: f64 = 10.0;

/// Longest document a plan may describe.
pub const MAX_PAGES: usize = 200;

const EPSILON: f64 = 1e-6;

/// Page dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width: 210.0,
        height: 297.0,
        margin: 10.0,
    };

    pub fn content_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    pub fn content_height(&self) -> f64 {
        self.height - 2.0 * self.margin
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// Pixel size of a captured region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotRegion {
    Metrics,
    Charts,
}

impl SnapshotRegion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Metrics => "metrics",
            Self::Charts => "charts",
        }
    }
}

/// One drawing of a region image on a page. `y` is negative for the
/// continuation of a region that started on an earlier page; the page clips
/// whatever falls outside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub region: SnapshotRegion,
    pub page: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePlan {
    pub page: PageSize,
    pub page_count: usize,
    pub placements: Vec<Placement>,
}

impl PagePlan {
    pub fn placements_on(&self, page: usize) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |placement| placement.page == page)
    }
}

fn scaled_height(page: &PageSize, region: SnapshotRegion, size: RegionSize) -> DashboardResult<f64> {
    if size.width == 0 || size.height == 0 {
        return Err(DashboardError::EmptyRegion(region.as_str()));
    }
    Ok(f64::from(size.height) * page.content_width() / f64::from(size.width))
}

struct Layout {
    page: PageSize,
    placements: Vec<Placement>,
}

impl Layout {
    /// Places a region with its top at `y` on `page_index`. Returns the page
    /// and the y coordinate where the region ends.
    fn place(&mut self, region: SnapshotRegion, height: f64, mut page_index: usize, mut y: f64) -> (usize, f64) {
        let bottom_limit = self.page.height - self.page.margin;
        loop {
            self.placements.push(Placement {
                region,
                page: page_index,
                x: self.page.margin,
                y,
                width: self.page.content_width(),
                height,
            });
            let bottom = y + height;
            if bottom <= bottom_limit + EPSILON {
                return (page_index, bottom);
            }
            let shown = bottom_limit - y;
            page_index += 1;
            y = self.page.margin - shown;
        }
    }
}

pub fn plan_pages(page: PageSize, metrics: RegionSize, charts: RegionSize) -> DashboardResult<PagePlan> {
    let finite = page.width.is_finite() && page.height.is_finite() && page.margin.is_finite();
    if !finite || page.content_width() <= 0.0 || page.content_height() <= 0.0 {
        return Err(DashboardError::invalid_value(
            "page",
            format!("{}x{} with margin {}", page.width, page.height, page.margin),
        ));
    }
    let metrics_height = scaled_height(&page, SnapshotRegion::Metrics, metrics)?;
    let charts_height = scaled_height(&page, SnapshotRegion::Charts, charts)?;

    // Each region spans at most ceil(height / content) pages, plus one page
    // lost when the charts do not fit under the metrics.
    let content = page.content_height();
    let worst_case = (metrics_height / content).ceil() + (charts_height / content).ceil() + 1.0;
    if worst_case > MAX_PAGES as f64 {
        return Err(DashboardError::invalid_value(
            "regions",
            format!("{metrics_height:.0} and {charts_height:.0} high need more than {MAX_PAGES} pages"),
        ));
    }

    let mut layout = Layout {
        page,
        placements: Vec::with_capacity(2),
    };
    let (page_index, end) = layout.place(SnapshotRegion::Metrics, metrics_height, 0, page.margin);

    let top = end + REGION_GAP;
    let remaining = page.height - page.margin - top;
    let (last_page, _) = if charts_height <= remaining + EPSILON {
        layout.place(SnapshotRegion::Charts, charts_height, page_index, top)
    } else {
        layout.place(SnapshotRegion::Charts, charts_height, page_index + 1, page.margin)
    };

    Ok(PagePlan {
        page,
        page_count: last_page + 1,
        placements: layout.placements,
    })
}
