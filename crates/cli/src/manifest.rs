use anyhow::{Context, Result, bail};
use argline::{ArgClass, ArgSpec, ArgValue, FlagStyle, Parser, ValueType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST_NAME: &str = "argline.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgEntry>,
}

/// One argument declaration as written in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgEntry {
    pub id: i32,
    pub class: ArgClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_params: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_style: Option<FlagStyle>,
    /// Any JSON scalar; converted to the argument's value type on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ArgEntry {
    pub fn to_spec(&self) -> Result<ArgSpec> {
        let mut spec = ArgSpec::new(self.class, self.id).help(self.help.clone());
        if let Some(short) = &self.short {
            spec = spec.short(short.clone());
        }
        if let Some(long) = &self.long {
            spec = spec.long(long.clone());
        }
        if let Some(value_type) = self.value_type {
            spec = spec.value_type(value_type);
        }
        if let Some(n) = self.num_params {
            spec = spec.num_params(n);
        }
        if let Some(style) = self.flag_style {
            spec = spec.flag_style(style);
        }
        if let Some(raw) = &self.default {
            let value = default_value(spec.resolved_value_type(), raw)
                .with_context(|| format!("invalid default for argument {}", self.id))?;
            spec = spec.default_value(value);
        }
        Ok(spec)
    }
}

fn default_value(value_type: ValueType, raw: &Value) -> Result<ArgValue> {
    let value = match (value_type, raw) {
        (ValueType::Boolean, Value::Bool(b)) => ArgValue::Bool(*b),
        (ValueType::Integer, Value::Number(n)) => {
            let n = n.as_i64().context("expected an integer")?;
            ArgValue::Int(i32::try_from(n).context("integer out of range")?)
        }
        (ValueType::Float, Value::Number(n)) => {
            ArgValue::Float(n.as_f64().context("expected a number")? as f32)
        }
        (ValueType::Double, Value::Number(n)) => {
            ArgValue::Double(n.as_f64().context("expected a number")?)
        }
        (ValueType::String | ValueType::File, Value::String(s)) => ArgValue::Str(s.clone()),
        (ValueType::String | ValueType::File, Value::Number(n)) => ArgValue::Str(n.to_string()),
        (value_type, raw) => bail!("{raw} is not a valid {value_type} default"),
    };
    Ok(value)
}

impl Manifest {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse manifest JSON: {}", path.display()))
    }

    /// Build a parser with every declared argument registered in order.
    pub fn to_parser(&self) -> Result<Parser> {
        let mut parser = Parser::new();
        for entry in &self.args {
            parser.add_spec(entry.to_spec()?);
        }
        tracing::debug!(count = self.args.len(), "registered arguments");
        Ok(parser)
    }
}

pub fn load_manifest(manifest_path: &Path) -> Result<Manifest> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let path = resolve_against(&cwd, manifest_path);
    if !path.exists() {
        bail!("manifest not found: {}", path.display());
    }
    Manifest::from_file(&path)
}

fn sample_manifest(name: String) -> Manifest {
    let entry = |id, class, short: &str, long: &str, help: &str| ArgEntry {
        id,
        class,
        short: Some(short.to_string()),
        long: Some(long.to_string()),
        help: help.to_string(),
        value_type: None,
        num_params: None,
        flag_style: None,
        default: None,
    };

    Manifest {
        schema_version: Some(1),
        name: Some(name),
        args: vec![
            entry(1, ArgClass::ExclusiveSwitch, "h", "help", "Show this info"),
            entry(2, ArgClass::Switch, "v", "verbose", "Verbose output"),
            ArgEntry {
                value_type: Some(ValueType::Integer),
                default: Some(Value::from(1)),
                ..entry(3, ArgClass::Optional, "n", "count", "How many times")
            },
            ArgEntry {
                value_type: Some(ValueType::String),
                ..entry(4, ArgClass::Required, "o", "output", "Output name")
            },
        ],
    }
}

pub fn write_default_manifest(project_dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = project_dir.join(DEFAULT_MANIFEST_NAME);
    if dest.exists() && !overwrite {
        bail!("{} already exists", dest.display());
    }

    let project_name = guess_project_name(project_dir).unwrap_or_else(|| "my-cli".to_string());
    let manifest = sample_manifest(project_name);

    let mut out = serde_json::to_string_pretty(&manifest).context("failed to serialize manifest")?;
    out.push('\n');

    fs::create_dir_all(project_dir)
        .with_context(|| format!("failed to create directory: {}", project_dir.display()))?;
    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest)
            .with_context(|| format!("failed to remove existing {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn guess_project_name(project_dir: &Path) -> Option<String> {
    let file_name = project_dir.file_name().and_then(|s| s.to_str());
    let direct = file_name.filter(|s| !s.is_empty() && *s != "." && *s != "..");
    if let Some(name) = direct {
        return Some(name.to_string());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(|s| s.to_string())
}
