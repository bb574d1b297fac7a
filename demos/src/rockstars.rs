// This example reads a delimited text file of rockstars, applies a schema
// to every line to build rows, and prints the rows with `mk_string`
// and as an Arrow table
//
// RUST_LOG=debug cargo run --bin rockstars -- --double-format jvm

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use arrow::util::pretty::print_batches;
use clap::Parser;
use spark_row_rs::batch::rows_to_batch;
use spark_row_rs::{
    DataType, Decimal, DoubleFormat, FormatOptions, Row, RowError, StructType, Value,
};

const ROCKSTARS_DDL: &str = "surname string, forename string, age int, birthday string, \
    numkids int, married boolean, networth double, weight float, percent double";

#[derive(Parser)]
#[command(name = "rockstars", about = "Build Spark rows from a delimited text file")]
struct Cli {
    /// Text file with one record per line
    #[arg(long, default_value = "demos/data/rockers.txt")]
    path: PathBuf,

    /// Field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Schema as a DDL column list
    #[arg(long, default_value = ROCKSTARS_DDL)]
    schema: String,

    /// `shortest` or `jvm`, overrides SPARK_ROW_DOUBLE_FORMAT
    #[arg(long)]
    double_format: Option<DoubleFormat>,
}

fn parse_value(part: &str, data_type: &DataType) -> Result<Value, Box<dyn std::error::Error>> {
    if part.is_empty() {
        return Ok(Value::Null);
    }

    let value = match data_type {
        DataType::Boolean => Value::Boolean(part.parse()?),
        DataType::Byte => Value::Byte(part.parse()?),
        DataType::Short => Value::Short(part.parse()?),
        DataType::Integer => Value::Integer(part.parse()?),
        DataType::Long => Value::Long(part.parse()?),
        DataType::Float => Value::Float(part.parse()?),
        DataType::Double => Value::Double(part.parse()?),
        DataType::Decimal { .. } => Value::Decimal(part.parse::<Decimal>()?),
        _ => Value::String(part.to_string()),
    };

    Ok(value)
}

/// One delimited line as a row. A line with more or fewer columns than the
/// schema has fields is rejected as a whole.
fn parse_record(
    line: &str,
    delimiter: char,
    schema: &Arc<StructType>,
) -> Result<Row, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = line.split(delimiter).collect();
    if parts.len() != schema.field_count() {
        return Err(RowError::ArityMismatch {
            expected: schema.field_count(),
            actual: parts.len(),
        }
        .into());
    }

    let values = parts
        .iter()
        .zip(schema.fields())
        .map(|(part, field)| parse_value(part.trim(), &field.data_type))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Row::create(values, Arc::clone(schema))?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut options = FormatOptions::from_env()?;
    if let Some(double_format) = cli.double_format {
        options = options.double_format(double_format);
    }

    let schema = Arc::new(StructType::from_ddl(&cli.schema)?);
    let text = fs::read_to_string(&cli.path)?;

    let mut rows = Vec::new();
    for (line_no, line) in text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
        match parse_record(line, cli.delimiter, &schema) {
            Ok(row) => rows.push(row),
            Err(e) => tracing::warn!(line = line_no + 1, error = %e, "bad record, skipping"),
        }
    }

    tracing::info!(rows = rows.len(), path = %cli.path.display(), "rows loaded");

    for row in &rows {
        println!("{}", row.mk_string_with_options("", ",", "", &options));
    }

    let with_nulls = rows.iter().filter(|row| row.any_null()).count();
    println!("{} of {} rows contain a null", with_nulls, rows.len());

    print_batches(&[rows_to_batch(&rows, &schema)?])?;

    // Jovi,Bon,53,March 02 1962,4,true,300000000.11,161.6,0.45
    // Tyler,Steven,67,March 26 1948,4,false,130000000,138.5,0.41
    // Jagger,Mick,72,July 26 1943,8,false,null,154.3,0.52
    // Springsteen,Bruce,66,September 23 1949,3,true,460000000,154,0.48
    // 1 of 4 rows contain a null

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rockstars_schema() -> Arc<StructType> {
        Arc::new(StructType::from_ddl(ROCKSTARS_DDL).unwrap())
    }

    #[test]
    fn test_parse_record() {
        let row = parse_record(
            "Jagger,Mick,72,July 26 1943,8,false,,154.3,0.52",
            ',',
            &rockstars_schema(),
        )
        .unwrap();

        assert_eq!("Mick", row.get_string(1).unwrap());
        assert_eq!(154.3f32, row.get_float(7).unwrap());
        assert!(row.is_null_at(6).unwrap());
    }

    #[test]
    fn test_parse_record_wrong_column_count() {
        let schema = rockstars_schema();

        for line in [
            "Jovi,Bon,53,March 02 1962,4,true,300000000.11,161.6,0.45,extra",
            "Jovi,Bon,53,March 02 1962,4,true,300000000.11,161.6",
        ] {
            let err = parse_record(line, ',', &schema).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<RowError>(),
                Some(RowError::ArityMismatch { expected: 9, .. })
            ));
        }
    }

    #[test]
    fn test_parse_record_bad_number() {
        let line = "Jovi,Bon,fifty,March 02 1962,4,true,300000000.11,161.6,0.45";
        assert!(parse_record(line, ',', &rockstars_schema()).is_err());
    }
}
