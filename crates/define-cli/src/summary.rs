//! Dataset summary table for `define-cli inspect`.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use define_model::{
    DanglingPointer, ItemGroup, ItemRefContainer, MetaDataVersion, Odm, audit_sources,
    dangling_references,
};

/// One dataset row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRow {
    pub oid: String,
    pub name: String,
    pub class: Option<String>,
    pub variables: usize,
    /// Key variable names in key sequence.
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefineSummary {
    pub study: String,
    pub define_version: Option<String>,
    pub datasets: Vec<DatasetRow>,
    pub item_defs: usize,
    pub code_lists: usize,
    pub value_lists: usize,
    pub where_clauses: usize,
    pub methods: usize,
    pub comments: usize,
    pub leafs: usize,
    pub dangling: Vec<DanglingPointer>,
    /// Entities whose stored back-references disagree with the forward pointers.
    pub source_mismatches: usize,
}

impl DefineSummary {
    pub fn from_odm(odm: &Odm) -> Self {
        let mdv = odm.mdv();
        let study = odm
            .study
            .global_variables
            .study_name
            .clone()
            .unwrap_or_else(|| mdv.name.clone());
        Self {
            study,
            define_version: mdv.define_version.clone(),
            datasets: ordered_groups(mdv)
                .into_iter()
                .map(|group| dataset_row(mdv, group))
                .collect(),
            item_defs: mdv.item_defs.len(),
            code_lists: mdv.code_lists.len(),
            value_lists: mdv.value_lists.len(),
            where_clauses: mdv.where_clauses.len(),
            methods: mdv.methods.len(),
            comments: mdv.comments.len(),
            leafs: mdv.leafs.len(),
            dangling: dangling_references(mdv),
            source_mismatches: audit_sources(mdv).len(),
        }
    }

    /// No dangling pointers and every back-reference matches.
    pub fn is_consistent(&self) -> bool {
        self.dangling.is_empty() && self.source_mismatches == 0
    }

    pub fn counts_line(&self) -> String {
        format!(
            "datasets={} variables={} codelists={} valuelists={} whereclauses={} methods={} comments={} leafs={}",
            self.datasets.len(),
            self.item_defs,
            self.code_lists,
            self.value_lists,
            self.where_clauses,
            self.methods,
            self.comments,
            self.leafs,
        )
    }

    pub fn dataset_table(&self) -> Table {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Dataset"),
            header_cell("Class"),
            header_cell("Variables"),
            header_cell("Keys"),
        ]);
        apply_summary_table_style(&mut table);
        align_column(&mut table, 2, CellAlignment::Right);
        for row in &self.datasets {
            table.add_row(vec![
                Cell::new(&row.name).add_attribute(Attribute::Bold),
                optional_cell(row.class.as_deref()),
                Cell::new(row.variables),
                if row.keys.is_empty() {
                    dim_cell("-")
                } else {
                    Cell::new(row.keys.join(", "))
                },
            ]);
        }
        let total: usize = self.datasets.iter().map(|row| row.variables).sum();
        table.add_row(vec![
            Cell::new("TOTAL")
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            dim_cell("-"),
            Cell::new(total).add_attribute(Attribute::Bold),
            dim_cell("-"),
        ]);
        table
    }
}

pub fn print_summary(summary: &DefineSummary) {
    match &summary.define_version {
        Some(version) => println!("Study: {} (Define-XML {version})", summary.study),
        None => println!("Study: {}", summary.study),
    }
    println!("{}", summary.dataset_table());
    println!("{}", summary.counts_line());
    if !summary.dangling.is_empty() {
        eprintln!("Unresolved references:");
        for pointer in &summary.dangling {
            eprintln!("- {pointer}");
        }
    }
    if summary.source_mismatches > 0 {
        eprintln!(
            "{} entities have back-references out of sync",
            summary.source_mismatches
        );
    }
}

/// Groups in document order, then any not listed in the order.
fn ordered_groups(mdv: &MetaDataVersion) -> Vec<&ItemGroup> {
    let mut groups: Vec<&ItemGroup> = mdv
        .order
        .item_group_order
        .iter()
        .filter_map(|oid| mdv.item_groups.get(oid))
        .collect();
    groups.extend(
        mdv.item_groups
            .values()
            .filter(|group| !mdv.order.item_group_order.contains(&group.oid)),
    );
    groups
}

fn dataset_row(mdv: &MetaDataVersion, group: &ItemGroup) -> DatasetRow {
    let keys = group
        .key_order()
        .iter()
        .filter_map(|ref_oid| group.item_refs().get(ref_oid))
        .map(|item_ref| {
            mdv.item_defs
                .get(&item_ref.item_oid)
                .map_or_else(|| item_ref.item_oid.clone(), |item| item.name.clone())
        })
        .collect();
    DatasetRow {
        oid: group.oid.clone(),
        name: group.name.clone(),
        class: group.dataset_class.as_ref().map(|class| class.name.clone()),
        variables: group.item_refs().len(),
        keys,
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(text) => Cell::new(text),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
