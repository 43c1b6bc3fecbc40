//! Table stories: a story whose only content is one IDML `Table`.

use crate::dom::{Dom, NodeId};
use crate::error::{Error, Result};
use crate::estimate::HeightEstimator;

use super::attrs::{AttrSet, Merge, attribute_groups};
use super::story::{StoryAttributes, StoryContent, story_filename};
use super::xml::{self, XmlElement};

attribute_groups! {
    pub struct StoryTableAttributes {
        story,
        table,
        cell,
        paragraph_style_range,
        character_style_range,
        story_preference,
    }
}

impl StoryTableAttributes {
    pub fn defaults() -> Self {
        let story = StoryAttributes::defaults();
        Self {
            story: story.story,
            table: AttrSet::from_pairs(&[
                ("HeaderRowCount", "0"),
                ("FooterRowCount", "0"),
                ("AppliedTableStyle", "TableStyle/$ID/[Basic Table]"),
                ("TableDirection", "LeftToRightDirection"),
            ]),
            cell: AttrSet::from_pairs(&[
                ("CellType", "TextTypeCell"),
                ("AppliedCellStyle", "CellStyle/$ID/[None]"),
            ]),
            paragraph_style_range: story.paragraph_style_range,
            character_style_range: story.character_style_range,
            story_preference: story.story_preference,
        }
    }

    pub fn with_point_size(point_size: f64) -> Self {
        Self {
            character_style_range: AttrSet::new().with("PointSize", point_size),
            ..Self::default()
        }
    }
}

/// Rectangular cell grid read from a `<table>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct TableGrid {
    pub rows: usize,
    pub columns: usize,
    /// Row-major; each cell holds its paragraph texts.
    pub cells: Vec<Vec<String>>,
}

impl TableGrid {
    /// Read rows (`tr`) and cells (`td`/`th`) of `table`.
    ///
    /// Rows of nested tables belong to the cell that holds them. Every row
    /// must have the same number of cells; anything else cannot be expressed
    /// as a `ColumnCount` and is rejected.
    pub fn from_dom(dom: &Dom, table: NodeId) -> Result<Self> {
        let mut rows = Vec::new();
        collect_rows(dom, table, &mut rows);
        if rows.is_empty() {
            return Err(Error::malformed("table has no rows"));
        }

        let row_cells: Vec<Vec<NodeId>> = rows
            .iter()
            .map(|&row| {
                dom.children(row)
                    .filter(|&id| {
                        dom.element_name(id)
                            .is_some_and(|n| n.as_ref() == "td" || n.as_ref() == "th")
                    })
                    .collect()
            })
            .collect();

        let columns = row_cells[0].len();
        if let Some((index, uneven)) = row_cells
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns)
        {
            let total: usize = row_cells.iter().map(Vec::len).sum();
            return Err(Error::malformed(format!(
                "table row {index} has {} cells, expected {columns} ({total} cells in {} rows)",
                uneven.len(),
                rows.len()
            )));
        }
        if columns == 0 {
            return Err(Error::malformed("table rows have no cells"));
        }

        let cells = row_cells
            .into_iter()
            .flatten()
            .map(|cell| cell_paragraphs(dom, cell))
            .collect();

        Ok(Self {
            rows: rows.len(),
            columns,
            cells,
        })
    }
}

/// Rows under `node`, through `thead`/`tbody`/`tfoot`, without entering
/// nested tables.
fn collect_rows(dom: &Dom, node: NodeId, rows: &mut Vec<NodeId>) {
    for child in dom.children(node) {
        match dom.element_name(child).map(|n| &**n) {
            Some("tr") => rows.push(child),
            Some("table") => {}
            Some(_) => collect_rows(dom, child, rows),
            None => {}
        }
    }
}

/// Paragraph texts of a cell; a cell without `<p>` children is one paragraph.
fn cell_paragraphs(dom: &Dom, cell: NodeId) -> Vec<String> {
    let paragraphs = dom.elements_by_tag(cell, "p");
    if paragraphs.is_empty() {
        let text = dom.text_content(cell);
        let text = text.trim();
        return if text.is_empty() {
            Vec::new()
        } else {
            vec![text.to_string()]
        };
    }
    paragraphs
        .into_iter()
        .map(|p| dom.text_content(p))
        .collect()
}

/// A table block laid out as a single text frame.
#[derive(Debug, Clone)]
pub struct StoryTable {
    self_id: String,
    node: NodeId,
    grid: TableGrid,
    tree: XmlElement,
}

impl StoryTable {
    /// Build the table story for `node`; columns share `inner_page_width`
    /// equally.
    pub fn new(
        self_id: impl Into<String>,
        dom: &Dom,
        node: NodeId,
        inner_page_width: f64,
        overrides: &StoryTableAttributes,
    ) -> Result<Self> {
        let self_id = self_id.into();
        let attrs = StoryTableAttributes::defaults().merge(overrides);
        let grid = TableGrid::from_dom(dom, node)?;

        let story = XmlElement::new("Story")
            .attrs(&attrs.story)
            .attr("Self", self_id.as_str())
            .child(build_table(&self_id, &grid, inner_page_width, &attrs))
            .child(XmlElement::new("StoryPreference").attrs(&attrs.story_preference));

        Ok(Self {
            self_id,
            node,
            grid,
            tree: XmlElement::package_root("Story").child(story),
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn grid(&self) -> &TableGrid {
        &self.grid
    }

    pub fn filename(&self) -> String {
        story_filename(&self.self_id)
    }

    pub fn tree(&self) -> &XmlElement {
        &self.tree
    }

    pub fn render(&self) -> String {
        xml::document(&self.tree)
    }
}

fn build_table(
    self_id: &str,
    grid: &TableGrid,
    inner_page_width: f64,
    attrs: &StoryTableAttributes,
) -> XmlElement {
    let mut table = XmlElement::new("Table")
        .attrs(&attrs.table)
        .attr("Self", format!("{self_id}_table"))
        .attr("BodyRowCount", grid.rows.to_string())
        .attr("ColumnCount", grid.columns.to_string());

    for r in 0..grid.rows {
        table.push(
            XmlElement::new("Row")
                .attr("Self", format!("{self_id}_table_row{r}"))
                .attr("Name", r.to_string()),
        );
    }

    let column_width = inner_page_width / grid.columns as f64;
    for c in 0..grid.columns {
        table.push(
            XmlElement::new("Column")
                .attr("Self", format!("{self_id}_table_column{c}"))
                .attr("Name", c.to_string())
                .attr("SingleColumnWidth", column_width.to_string()),
        );
    }

    for (index, paragraphs) in grid.cells.iter().enumerate() {
        let (row, column) = (index / grid.columns, index % grid.columns);

        let mut character_style_range =
            XmlElement::new("CharacterStyleRange").attrs(&attrs.character_style_range);
        for (i, text) in paragraphs.iter().enumerate() {
            if i > 0 {
                character_style_range.push(XmlElement::new("Br"));
            }
            character_style_range.push(XmlElement::new("Content").text(text.as_str()));
        }

        table.push(
            XmlElement::new("Cell")
                .attrs(&attrs.cell)
                .attr("Self", format!("{self_id}_table_i{index}"))
                .attr("Name", format!("{column}:{row}"))
                .child(
                    XmlElement::new("ParagraphStyleRange")
                        .attrs(&attrs.paragraph_style_range)
                        .child(character_style_range),
                ),
        );
    }

    table
}

impl StoryContent for StoryTable {
    fn self_id(&self) -> &str {
        &self.self_id
    }

    /// Tables have no scalar length.
    fn length(&self) -> Result<usize> {
        Err(Error::UnsupportedOperation("length of a table story"))
    }

    fn estimate_height(&self, estimator: &HeightEstimator) -> f64 {
        estimator.table_height()
    }
}
