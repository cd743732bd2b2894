//! Table row insertion.
//!
//! [§ 4.9.1 The table element](https://html.spec.whatwg.org/multipage/tables.html#the-table-element)

use crate::{DomError, DomTree, NodeId};

impl DomTree {
    /// [§ 4.9.1 `rows`](https://html.spec.whatwg.org/multipage/tables.html#dom-table-rows)
    ///
    /// "The rows attribute must return an `HTMLCollection` rooted at the table
    /// node, whose filter matches only tr elements that are either children of
    /// the table element, or children of thead, tbody, or tfoot elements that
    /// are themselves children of the table element. The elements in the
    /// collection must be ordered such that those elements whose parent is a
    /// thead are included first, in tree order, followed by those elements
    /// whose parent is either a table or tbody element, again in tree order,
    /// followed finally by those elements whose parent is a tfoot element,
    /// still in tree order."
    #[must_use]
    pub fn table_rows(&self, table: NodeId) -> Vec<NodeId> {
        let rows_of = |section: NodeId| {
            self.children(section)
                .iter()
                .copied()
                .filter(|&id| self.is_html_element(id, "tr"))
                .collect::<Vec<_>>()
        };

        let mut head = Vec::new();
        let mut body = Vec::new();
        let mut foot = Vec::new();
        for &child in self.children(table) {
            if self.is_html_element(child, "tr") {
                body.push(child);
            } else if self.is_html_element(child, "thead") {
                head.extend(rows_of(child));
            } else if self.is_html_element(child, "tbody") {
                body.extend(rows_of(child));
            } else if self.is_html_element(child, "tfoot") {
                foot.extend(rows_of(child));
            }
        }
        head.extend(body);
        head.extend(foot);
        head
    }

    /// [§ 4.9.1 `insertRow(index)`](https://html.spec.whatwg.org/multipage/tables.html#dom-table-insertrow)
    ///
    /// Creates a `tr` element and inserts it into `table`, returning the new row.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotAnElement`] if `table` is not an HTML `table`
    /// element, and [`DomError::IndexSize`] if `index` is outside `-1..=rows`.
    pub fn insert_row(&mut self, table: NodeId, index: i64) -> Result<NodeId, DomError> {
        if !self.is_html_element(table, "table") {
            return Err(DomError::NotAnElement(table));
        }
        let rows = self.table_rows(table);

        // STEP 1: "If index is less than −1 or greater than the number of
        //          elements in rows collection, throw an IndexSizeError."
        let position = match index {
            -1 => rows.len(),
            i => match usize::try_from(i) {
                Ok(i) if i <= rows.len() => i,
                _ => {
                    return Err(DomError::IndexSize {
                        index,
                        rows: rows.len(),
                    });
                }
            },
        };

        let row = self.create_html_element("tr");

        if rows.is_empty() {
            let last_tbody = self
                .children(table)
                .iter()
                .rev()
                .find(|&&id| self.is_html_element(id, "tbody"))
                .copied();
            if let Some(tbody) = last_tbody {
                // STEP 3: "append to the last tbody element child of the table"
                self.append_child(tbody, row)?;
            } else {
                // STEP 2: "create a tbody element, then create a tr element, then
                //          append the tr element to the tbody element, then append
                //          the tbody element to the table element"
                let tbody = self.create_html_element("tbody");
                self.append_child(tbody, row)?;
                self.append_child(table, tbody)?;
            }
        } else if position == rows.len() {
            // STEP 4: "append to the parent of the last tr element in the rows
            //          collection"
            let parent = self.parent(rows[rows.len() - 1]).unwrap_or(table);
            self.append_child(parent, row)?;
        } else {
            // STEP 5: "insert as the immediately preceding sibling of the
            //          index-th tr element in the rows collection"
            let reference = rows[position];
            let parent = self.parent(reference).unwrap_or(table);
            self.insert_before(parent, row, reference)?;
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_row_creates_tbody() {
        let mut tree = DomTree::new();
        let table = tree.create_html_element("table");
        tree.append_child(NodeId::ROOT, table).unwrap();

        let row = tree.insert_row(table, -1).unwrap();
        let tbody = tree.parent(row).unwrap();
        assert!(tree.is_html_element(tbody, "tbody"));
        assert_eq!(tree.parent(tbody), Some(table));
    }

    #[test]
    fn test_insert_row_index_out_of_range() {
        let mut tree = DomTree::new();
        let table = tree.create_html_element("table");
        assert_eq!(
            tree.insert_row(table, 1),
            Err(DomError::IndexSize { index: 1, rows: 0 })
        );
        assert_eq!(
            tree.insert_row(table, -2),
            Err(DomError::IndexSize { index: -2, rows: 0 })
        );
    }

    #[test]
    fn test_insert_row_before_existing() {
        let mut tree = DomTree::new();
        let table = tree.create_html_element("table");
        let first = tree.insert_row(table, 0).unwrap();
        let second = tree.insert_row(table, 0).unwrap();
        assert_eq!(tree.table_rows(table), vec![second, first]);
    }

    #[test]
    fn test_rows_order_thead_first() {
        let mut tree = DomTree::new();
        let table = tree.create_html_element("table");
        let tfoot = tree.create_html_element("tfoot");
        let thead = tree.create_html_element("thead");
        tree.append_child(table, tfoot).unwrap();
        tree.append_child(table, thead).unwrap();
        let foot_row = tree.create_html_element("tr");
        let head_row = tree.create_html_element("tr");
        tree.append_child(tfoot, foot_row).unwrap();
        tree.append_child(thead, head_row).unwrap();

        assert_eq!(tree.table_rows(table), vec![head_row, foot_row]);
    }
}
