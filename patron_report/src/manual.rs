/*!

This is the long-form manual for `patron_report` and `checkin`.

## Input

The input is an export of ticket orders, with one row per ticket and a header row.
The following columns are read (the names can be changed in the configuration file):

* `First Name` (required)
* `Last Name` (required)
* `Ticket I.D.` (required)
* `Seat` (required)
* `Status` (optional). When present, only the rows with the status `Paid` are counted,
  unless `--all-statuses` is passed or another status is chosen with `--paid-status`.
* `Notes` (optional). The notes are collected per patron and printed on the check-in sheet.

Other columns are ignored. The input can be a CSV file (`csv`) or an Excel workbook (`xlsx`).

### `csv`

Comma separated values, UTF-8. A byte order mark at the start of the file is accepted.
Rows shorter than the header are completed with empty cells.

### `xlsx`

The first worksheet is used, unless `--excel-worksheet-name` names another one.
Numbers are converted to text: a seat stored as `12.0` reads as `12`.

## Aggregation

The rows are grouped by first and last name. Surrounding spaces are removed and `&amp;`
is turned back into `&`. For each patron:

* `Tickets_Ordered` is the number of rows
* `Seats` lists the seats, each seat once, in the order of the export
* `Notes` lists the non-empty notes, each note once

Rows with an empty first or last name are left out. The patrons are sorted by last name,
then by first name.

## Outputs

* the aggregated table, printed on the terminal
* `Aggregated_Ticket_Report.csv`: the same table as CSV
* `Patron_Checkin_List.pdf`: the check-in sheet, one row per patron with a `[ ]` box to tick
* optionally, a JSON summary (`--out`)

```bash
checkin -i orders.csv --pdf-out door.pdf --title "Friday show"
```

*/
