use std::fmt;


/// Plain text table whose columns are padded to their widest cell.
#[derive(Debug, Clone, Default)]
pub struct AlignedTextTable {
	rows: Vec<Vec<String>>,
}
impl AlignedTextTable {
	pub fn new(add_initial_row: bool) -> Self {
		let mut table = Self::default();
		if add_initial_row { table.new_row(); }
		table
	}

	pub fn new_row(&mut self) {
		self.rows.push(Vec::new());
	}

	pub fn n_rows(&self) -> usize { self.rows.len() }

	/// Cells in the row currently being filled, `None` before the first row.
	pub fn current_cell_count(&self) -> Option<usize> {
		self.rows.last().map(Vec::len)
	}

	/// Appends a cell to the current row, opening a row if there is none.
	pub fn add_cell<T: fmt::Display>(&mut self, content: T) {
		if self.rows.is_empty() { self.new_row(); }
		if let Some(row) = self.rows.last_mut() {
			row.push(content.to_string());
		}
	}

	fn column_widths(&self) -> Vec<usize> {
		let n_cols = self.rows.iter().map(Vec::len).max().unwrap_or(0);
		let mut widths = vec![0; n_cols];
		self.rows.iter().for_each(|row| {
			row.iter().enumerate().for_each(|(i_col, cell)| {
				widths[i_col] = widths[i_col].max(cell.chars().count());
			});
		});
		widths
	}

	/// One string per row. Every cell is left aligned and padded to its column
	/// width, neighbouring cells are separated by a single space.
	pub fn lines(&self) -> Vec<String> {
		let widths = self.column_widths();
		self.rows.iter().map(|row| {
			row.iter()
			.zip(widths.iter())
			.map(|(cell, &width)| format!("{:<width$}", cell, width=width))
			.collect::<Vec<String>>()
			.join(" ")
		})
		.collect()
	}

	/// Concatenates the rows of all tables; the last row stays open.
	pub fn merge<'a, I: IntoIterator<Item=&'a AlignedTextTable>>(tables: I) -> Self {
		let mut merged = Self::new(false);
		tables.into_iter().for_each(|table| merged.rows.extend(table.rows.iter().cloned()));
		if merged.rows.is_empty() { merged.new_row(); }
		merged
	}
}
impl fmt::Display for AlignedTextTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for line in self.lines() {
			writeln!(f, "{}", line)?;
		}
		Ok(())
	}
}


#[test]
fn test_columns_are_aligned() {
	let mut table = AlignedTextTable::new(true);
	table.add_cell("metric");
	table.add_cell("value");
	table.new_row();
	table.add_cell("val_loss");
	table.add_cell(0.25);
	table.new_row();
	table.add_cell("acc");
	assert_eq!(table.lines(), vec![
		"metric   value".to_string(),
		"val_loss 0.25 ".to_string(),
		"acc     ".to_string(),
	]);
	assert_eq!(table.current_cell_count(), Some(1));
}

#[test]
fn test_empty_table() {
	let table = AlignedTextTable::new(false);
	assert_eq!(table.current_cell_count(), None);
	assert!(table.lines().is_empty());
	let mut table = AlignedTextTable::new(true);
	assert_eq!(table.lines(), vec![String::new()]);
	table.add_cell(1);
	assert_eq!(table.to_string(), "1\n");
}

#[test]
fn test_merge_keeps_row_order() {
	let mut a = AlignedTextTable::new(true);
	a.add_cell("a");
	let mut b = AlignedTextTable::new(true);
	b.add_cell("bbb");
	b.add_cell("x");
	let mut merged = AlignedTextTable::merge([&a, &b]);
	assert_eq!(merged.n_rows(), 2);
	merged.add_cell("y");
	assert_eq!(merged.lines(), vec!["a  ".to_string(), "bbb x y".to_string()]);
	assert_eq!(AlignedTextTable::merge(Vec::<&AlignedTextTable>::new()).current_cell_count(), Some(0));
}
