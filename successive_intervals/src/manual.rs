/*!

This is the long-form manual for `successive_intervals` and the `msi` command.

## The transformation

The Method of Successive Intervals turns the answers to a 5-point item into
interval scores. For every item:

1. `F`: the number of answers in each category 1 to 5. Empty cells and values
   outside of 1..5 are not counted, and are not part of the total `N` either.
2. `P=F/N`: the proportions.
3. `CP`: the cumulative proportions.
4. `MID_CP`: the middle of each interval, `CP - P/2`.
5. `0.5-MID_CP`: shown for reference, not used further.
6. `Z`: the standard normal quantile of `MID_CP`. A midpoint of exactly 0 is
   placed at -3.9 and a midpoint of exactly 1 is placed at +3.9.
7. `ZC`: `Z` shifted so that the smallest value is 0.
8. `Pembulatan`: `ZC` rounded to the nearest integer, halves going to the even
   neighbour (2.5 gives 2, 3.5 gives 4).

The last row is the new score of each category: every answer is replaced by it.

Items listed as reverse coded are flipped (`v -> 6 - v`) before anything is
counted, both for the statistics and for the recoded answers.

## Input formats

The input is a table with one column per item and one row per respondent. The
first row holds the names of the items. The format is picked from the extension:

### `xlsx`

Excel workbook, read with the worksheet given by `--input-sheet` (`Sheet1` by
default). Cells holding a whole number are answers; everything else (empty cells,
text, decimal numbers) is treated as a missing answer.

### `csv`

Comma separated values, with the same conventions.

```text
Q1,Q2,Q3
1,5,3
2,4,
5,4,3
```

## Output

The output workbook holds two worksheets:

- `Sheet1` has no header row. Every item takes a block of 9 rows (the item name
  and the categories 1..5, then one row per statistic), followed by two blank rows.

```text
| Q1         | 1    | 2    | 3    | 4    | 5    |
| F          | 2    | 1    | 3    | 1    | 3    |
| P=F/N      | 0.2  | 0.1  | 0.3  | 0.1  | 0.3  |
| CP         | 0.2  | 0.3  | 0.6  | 0.7  | 1    |
| MID_CP     | 0.1  | 0.25 | 0.45 | 0.65 | 0.85 |
| 0.5-MID_CP | 0.4  | 0.25 | 0.05 | -0.15| -0.35|
| Z          | -1.28| -0.67| -0.13| 0.39 | 1.04 |
| ZC         | 0    | 0.61 | 1.16 | 1.67 | 2.32 |
| Pembulatan | 0    | 1    | 1    | 2    | 2    |
```

- `Sheet2` has the same shape as the input, with the header row. Every answer is
  replaced by the `Pembulatan` value of its category. Missing answers stay empty.

## Configuration

All the options can be given on the command line, in the environment, or in a
`.env` file in the current directory:

| option            | environment          | default               |
|-------------------|----------------------|-----------------------|
| `--input`         | `INPUT_FILE`         | `responses.xlsx`      |
| `--input-sheet`   | `INPUT_SHEET`        | `Sheet1`              |
| `--output`        | `OUTPUT_FILE`        | `MSI_all_in_one.xlsx` |
| `--reverse-items` | `REVERSE_ITEMS`      | (none)                |
| `--summary`       | `MSI_SUMMARY_FILE`   | (none)                |
| `--reference`     | `MSI_REFERENCE_FILE` | (none)                |

`REVERSE_ITEMS` is a comma separated list of item names.

`--summary` writes all the statistics in JSON format. `--reference` compares
the statistics against a summary written by a previous run, and fails if they
differ.

 */
