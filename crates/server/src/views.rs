//! HTML pages
//!
//! Pages are assembled from static fragments and escaped values. All user
//! supplied text goes through [`escape_html`].

use billing::{format_amount, Decimal, Record, DEFAULT_CHARGE_LABELS};

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en" class="dark">
<head>
  <meta charset="UTF-8">
  <title>__TITLE__</title>
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <script src="https://cdn.tailwindcss.com"></script>
  <script>tailwind.config = { darkMode: 'class' };</script>
</head>
"#;

const INPUT_CLASS: &str =
    "w-full border border-gray-600 rounded-lg p-3 focus:ring-2 focus:ring-green-400 bg-gray-700 text-white";

/// Client-side behaviour of the record form
///
/// Rows are rebuilt from the hidden bootstrap JSON, or from the default
/// labels when it is empty. The total field is display only; the server
/// recomputes it from the submitted rows.
const FORM_SCRIPT: &str = r#"
  <script>
    function escapeAttr(value) {
      return String(value)
        .replace(/&/g, "&amp;")
        .replace(/"/g, "&quot;")
        .replace(/</g, "&lt;")
        .replace(/>/g, "&gt;");
    }

    function addRow(type = "", amount = "", remark = "") {
      const tbody = document.getElementById("charges-body");
      const tr = document.createElement("tr");
      tr.className = "hover:bg-gray-700";
      tr.innerHTML = `
        <td class="px-3 py-2 border border-gray-700">
          <input type="text" name="charge_type[]" value="${escapeAttr(type)}" placeholder="Charge type" class="w-full border border-gray-600 rounded p-2 bg-gray-700 text-white">
        </td>
        <td class="px-3 py-2 border border-gray-700 text-right">
          <input type="number" step="0.01" name="charge_amount[]" value="${escapeAttr(amount)}" class="w-full border border-gray-600 rounded p-2 bg-gray-700 text-right text-green-300" oninput="recomputeTotal()">
        </td>
        <td class="px-3 py-2 border border-gray-700">
          <input type="text" name="charge_remark[]" value="${escapeAttr(remark)}" placeholder="Remark (optional)" class="w-full border border-gray-600 rounded p-2 bg-gray-700 text-white">
        </td>
        <td class="px-3 py-2 border border-gray-700 text-center">
          <button type="button" class="px-2 py-1 bg-red-600 rounded hover:bg-red-700" onclick="this.closest('tr').remove(); recomputeTotal();">Remove</button>
        </td>
      `;
      tbody.appendChild(tr);
    }

    function recomputeTotal() {
      const amounts = Array.from(document.querySelectorAll('input[name="charge_amount[]"]'))
        .map(i => parseFloat(i.value || "0") || 0);
      const total = amounts.reduce((a, b) => a + b, 0);
      document.getElementById("total").value = total.toFixed(2);
    }

    (function init() {
      const form = document.getElementById("bill-form");
      const dt = document.getElementById("date");
      if (form.dataset.create === "true" && dt && !dt.value) {
        dt.value = new Date().toISOString().split("T")[0];
      }

      let charges = [];
      try { charges = JSON.parse(document.getElementById("bootstrap-charges").value) || []; } catch (e) { charges = []; }
      if (charges.length) {
        charges.forEach(ch => addRow(ch.type || "", ch.amount || "", ch.remark || ""));
      } else {
        JSON.parse(document.getElementById("default-labels").value).forEach(label => addRow(label, "", ""));
      }
      recomputeTotal();

      document.getElementById("add-row").addEventListener("click", () => addRow("", "", ""));
    })();

    document.addEventListener("input", () => {
      const from = document.getElementById("from_date").value;
      const toEl = document.getElementById("to_date");
      if (from && toEl.value && toEl.value < from) {
        toEl.setCustomValidity("To Date cannot be earlier than From Date");
      } else {
        toEl.setCustomValidity("");
      }
    });
  </script>
"#;

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn head(title: &str) -> String {
    HEAD.replace("__TITLE__", &escape_html(title))
}

/// Create or edit form
#[derive(Debug, Clone)]
pub struct FormView<'a> {
    pub title: String,
    pub header: String,
    pub action_url: String,
    pub submit_label: &'a str,
    /// Record being edited, `None` for an empty creation form
    pub record: Option<&'a Record>,
}

impl<'a> FormView<'a> {
    pub fn create() -> Self {
        Self {
            title: "PDF Generator".to_string(),
            header: "PDF Generator".to_string(),
            action_url: "/generate".to_string(),
            submit_label: "Generate",
            record: None,
        }
    }

    pub fn edit(id: i64, record: &'a Record) -> Self {
        Self {
            title: format!("Edit Record #{id}"),
            header: format!("Edit Record #{id}"),
            action_url: format!("/update/{id}"),
            submit_label: "Save Changes",
            record: Some(record),
        }
    }

    pub fn render(&self) -> String {
        let field = |text: Option<&str>| text.map(escape_html).unwrap_or_default();
        let total = self
            .record
            .map(|r| format_amount(r.total))
            .unwrap_or_default();
        let charges_json = self
            .record
            .and_then(|r| serde_json::to_string(&r.charges).ok())
            .unwrap_or_else(|| "[]".to_string());
        let labels_json =
            serde_json::to_string(&DEFAULT_CHARGE_LABELS).unwrap_or_else(|_| "[]".to_string());

        let mut html = head(&self.title);
        html.push_str(&format!(
            r#"<body class="bg-gray-900 text-white min-h-screen flex items-center justify-center font-sans">
  <div class="w-full max-w-5xl bg-gray-800 rounded-2xl shadow-lg p-8">
    <div class="flex justify-between items-center mb-6">
      <h1 class="text-3xl font-bold text-green-400">{header}</h1>
      <div class="flex gap-2">
        <a href="/records" class="px-4 py-2 bg-blue-600 rounded-lg hover:bg-blue-700">View Records</a>
        <a href="/" class="px-4 py-2 bg-slate-600 rounded-lg hover:bg-slate-700">New</a>
      </div>
    </div>

    <form method="post" action="{action}" class="space-y-6" id="bill-form" data-create="{is_create}">
      <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
        <div>
          <label class="block text-gray-300 font-medium mb-1">Name &amp; Address</label>
          <textarea name="name" class="{input}" rows="3" required>{name}</textarea>
        </div>
        <div class="grid grid-cols-1 gap-6">
          <div>
            <label class="block text-gray-300 font-medium mb-1">Date</label>
            <input type="date" name="date" id="date" value="{date}" class="{input}" required>
          </div>
          <div class="grid grid-cols-2 gap-4">
            <div>
              <label class="block text-gray-300 font-medium mb-1">From</label>
              <input type="date" id="from_date" name="from_date" value="{from_date}" class="{input}" required>
            </div>
            <div>
              <label class="block text-gray-300 font-medium mb-1">To</label>
              <input type="date" id="to_date" name="to_date" value="{to_date}" class="{input}" required>
            </div>
          </div>
        </div>
      </div>

      <div class="overflow-x-auto">
        <table class="w-full border border-gray-600 rounded-lg overflow-hidden text-sm" id="charges-table">
          <thead class="bg-gray-700">
            <tr>
              <th class="px-4 py-2 border border-gray-600 text-left">Charge Type</th>
              <th class="px-4 py-2 border border-gray-600 text-right">Amount</th>
              <th class="px-4 py-2 border border-gray-600 text-left">Remarks</th>
              <th class="px-4 py-2 border border-gray-600">Action</th>
            </tr>
          </thead>
          <tbody id="charges-body"></tbody>
        </table>
      </div>

      <div class="flex items-center justify-between gap-4">
        <button type="button" id="add-row" class="px-4 py-2 bg-emerald-600 rounded-lg hover:bg-emerald-700">+ Add Charge</button>
        <div class="flex-1"></div>
        <div class="w-60">
          <label class="block text-gray-300 font-medium mb-1">Total</label>
          <input name="total" id="total" value="{total}" class="w-full border border-gray-600 rounded-lg p-3 bg-gray-700 text-white text-right" readonly>
        </div>
      </div>

      <div class="flex justify-center gap-4">
        <button type="submit" class="px-6 py-3 bg-green-600 text-white rounded-lg shadow hover:bg-green-700 transition">{submit}</button>
        <a href="/records" class="px-6 py-3 bg-blue-600 text-white rounded-lg shadow hover:bg-blue-700 transition">View Records</a>
      </div>

      <input type="hidden" id="bootstrap-charges" value="{charges}" />
      <input type="hidden" id="default-labels" value="{labels}" />
    </form>
  </div>
"#,
            header = escape_html(&self.header),
            action = escape_html(&self.action_url),
            is_create = self.record.is_none(),
            input = INPUT_CLASS,
            name = field(self.record.map(|r| r.name.as_str())),
            date = field(self.record.map(|r| r.date.as_str())),
            from_date = field(self.record.map(|r| r.from_date.as_str())),
            to_date = field(self.record.map(|r| r.to_date.as_str())),
            total = total,
            submit = escape_html(self.submit_label),
            charges = escape_html(&charges_json),
            labels = escape_html(&labels_json),
        ));
        html.push_str(FORM_SCRIPT);
        html.push_str("</body>\n</html>\n");
        html
    }
}

/// Records listing with per-row actions and the grand total
pub fn records_page(records: &[Record], grand_total: Decimal) -> String {
    let mut rows = String::new();
    for record in records {
        let id = record.id.map(|id| id.to_string()).unwrap_or_default();
        rows.push_str(&format!(
            r#"          <tr class="hover:bg-gray-700">
            <td class="px-3 py-2 border border-gray-700">{id}</td>
            <td class="px-3 py-2 border border-gray-700">{name}</td>
            <td class="px-3 py-2 border border-gray-700">{date}</td>
            <td class="px-3 py-2 border border-gray-700">{from_date}</td>
            <td class="px-3 py-2 border border-gray-700">{to_date}</td>
            <td class="px-3 py-2 border border-gray-700 text-right">{total}</td>
            <td class="px-3 py-2 border border-gray-700">
              <div class="flex gap-2">
                <a href="/print/{id}" class="px-3 py-1 bg-emerald-600 rounded hover:bg-emerald-700">Print</a>
                <a href="/edit/{id}" class="px-3 py-1 bg-blue-600 rounded hover:bg-blue-700">Edit</a>
                <form method="post" action="/delete/{id}" onsubmit="return confirm('Delete this record?');">
                  <button class="px-3 py-1 bg-red-600 rounded hover:bg-red-700" type="submit">Delete</button>
                </form>
              </div>
            </td>
          </tr>
"#,
            name = escape_html(record.display_name()),
            date = escape_html(&record.date),
            from_date = escape_html(&record.from_date),
            to_date = escape_html(&record.to_date),
            total = format_amount(record.total),
        ));
    }
    if records.is_empty() {
        rows.push_str(
            r#"          <tr>
            <td colspan="7" class="px-3 py-6 text-center text-gray-400">No records yet.</td>
          </tr>
"#,
        );
    }

    let mut html = head("Database Records");
    html.push_str(&format!(
        r#"<body class="bg-gray-900 text-white min-h-screen font-sans">
  <div class="max-w-6xl mx-auto p-6">
    <div class="flex items-center justify-between mb-6">
      <h1 class="text-3xl font-bold text-green-400">Database Records</h1>
      <a href="/" class="px-4 py-2 bg-slate-600 rounded-lg hover:bg-slate-700">+ New</a>
    </div>

    <div class="bg-gray-800 rounded-2xl shadow-lg p-4 overflow-x-auto">
      <table class="w-full border border-gray-700 rounded-lg overflow-hidden text-sm">
        <thead class="bg-gray-700">
          <tr>
            <th class="px-3 py-2 border border-gray-600">ID</th>
            <th class="px-3 py-2 border border-gray-600">Name</th>
            <th class="px-3 py-2 border border-gray-600">Date</th>
            <th class="px-3 py-2 border border-gray-600">From</th>
            <th class="px-3 py-2 border border-gray-600">To</th>
            <th class="px-3 py-2 border border-gray-600 text-right">Total</th>
            <th class="px-3 py-2 border border-gray-600">Actions</th>
          </tr>
        </thead>
        <tbody>
{rows}        </tbody>
      </table>
    </div>

    <div class="mt-4 text-right text-xl font-semibold text-green-400">
      Grand Total: {grand_total}
    </div>

    <div class="mt-6">
      <a href="/" class="px-4 py-2 bg-green-600 rounded-lg hover:bg-green-700">Back to Form</a>
    </div>
  </div>
</body>
</html>
"#,
        grand_total = format_amount(grand_total),
    ));
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use billing::Charge;

    fn acme() -> Record {
        let mut record = Record::new(
            "Acme <Traders>\nStreet 1",
            "2024-01-01",
            "2024-01-01",
            "2024-01-31",
            vec![Charge::new("Rent", Decimal::from(100), "\"march\"")],
        );
        record.id = Some(3);
        record
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_create_form() {
        let html = FormView::create().render();
        assert!(html.contains("<title>PDF Generator</title>"));
        assert!(html.contains(r#"action="/generate""#));
        assert!(html.contains(r#"data-create="true""#));
        assert!(html.contains(r#"id="bootstrap-charges" value="[]""#));
        assert!(html.contains("C &amp; F CHARGES"));
        assert!(html.contains("HAMALI CHARGES"));
    }

    #[test]
    fn test_edit_form_prefills_record() {
        let record = acme();
        let html = FormView::edit(3, &record).render();

        assert!(html.contains("<title>Edit Record #3</title>"));
        assert!(html.contains(r#"action="/update/3""#));
        assert!(html.contains(r#"data-create="false""#));
        assert!(html.contains(">Acme &lt;Traders&gt;\nStreet 1</textarea>"));
        assert!(html.contains(r#"name="to_date" value="2024-01-31""#));
        assert!(html.contains(r#"value="100.00""#));
        assert!(html.contains("&quot;type&quot;:&quot;Rent&quot;"));
        assert!(html.contains("Save Changes"));
    }

    #[test]
    fn test_records_page() {
        let html = records_page(&[acme()], Decimal::from(100));
        assert!(html.contains(">Acme &lt;Traders&gt;</td>"));
        assert!(!html.contains("Street 1"));
        assert!(html.contains(r#"href="/print/3""#));
        assert!(html.contains(r#"action="/delete/3""#));
        assert!(html.contains("Grand Total: 100.00"));
        assert!(!html.contains("No records yet."));
    }

    #[test]
    fn test_empty_records_page() {
        let html = records_page(&[], Decimal::ZERO);
        assert!(html.contains("No records yet."));
        assert!(html.contains("Grand Total: 0.00"));
    }
}
