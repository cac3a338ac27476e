pub mod estimate_table;
pub mod kpi_card;
pub mod price_list_table;
pub mod toast;
