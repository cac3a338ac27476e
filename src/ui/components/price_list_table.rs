use dioxus::prelude::*;

use crate::infra::export::format_money;

/// One displayable price-list position with its selection flag.
#[derive(Clone, PartialEq)]
pub struct PriceListRow {
    pub key: String,
    pub unit: String,
    pub price: f64,
    pub selected: bool,
}

#[component]
pub fn PriceListTable(
    rows: Vec<PriceListRow>,
    currency: String,
    on_toggle: EventHandler<String>,
) -> Element {
    let count = rows.len();
    let is_empty = rows.is_empty();
    rsx! {
        div {
            class: "rounded-xl border border-slate-800 bg-slate-900/40",
            header {
                class: "flex items-center justify-between border-b border-slate-800 px-4 py-3",
                h3 { class: "text-sm font-semibold text-slate-200", "Прайс-лист" }
                span { class: "text-xs text-slate-500", "{count} позиций" }
            }
            if is_empty {
                p { class: "px-4 py-6 text-sm text-slate-500",
                    "Загрузите прайс-лист, чтобы выбрать позиции."
                }
            } else {
                table {
                    class: "min-w-full divide-y divide-slate-800 text-sm",
                    thead {
                        class: "bg-slate-900 text-left text-xs uppercase tracking-wide text-slate-500",
                        tr {
                            th { class: "px-4 py-3" }
                            th { class: "px-4 py-3 font-medium", "Наименование" }
                            th { class: "px-4 py-3 font-medium", "Ед. изм" }
                            th { class: "px-4 py-3 font-medium text-right", "Цена ({currency})" }
                        }
                    }
                    tbody {
                        class: "divide-y divide-slate-800",
                        for row in rows {
                            PriceListRowView { row, on_toggle: on_toggle.clone() }
                        }
                    }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct PriceListRowViewProps {
    row: PriceListRow,
    on_toggle: EventHandler<String>,
}

#[component]
fn PriceListRowView(props: PriceListRowViewProps) -> Element {
    let row = props.row;
    let row_class = if row.selected {
        "cursor-pointer transition-colors bg-indigo-500/10"
    } else {
        "cursor-pointer transition-colors hover:bg-slate-800/40"
    };
    let price_display = format_money(row.price);
    let toggle_key = row.key.clone();
    let checkbox_key = row.key.clone();
    rsx! {
        tr {
            class: row_class,
            onclick: move |_| props.on_toggle.call(toggle_key.clone()),
            td {
                class: "px-4 py-3",
                input {
                    r#type: "checkbox",
                    class: "h-4 w-4 cursor-pointer accent-indigo-500",
                    checked: row.selected,
                    onclick: move |evt| {
                        evt.stop_propagation();
                        props.on_toggle.call(checkbox_key.clone());
                    },
                }
            }
            td { class: "px-4 py-3 font-medium text-slate-100", "{row.key}" }
            td { class: "px-4 py-3 text-slate-300", "{row.unit}" }
            td { class: "px-4 py-3 text-right text-slate-300", "{price_display}" }
        }
    }
}
