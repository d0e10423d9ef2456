//! Clap CLI definitions for the `pc` command.
//!
//! Every catalog entity gets a subcommand group with the same verbs
//! (create, list, show, update, delete); pricing, state availability,
//! search and spreadsheet transfer sit alongside them.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// pc -- insurance product catalog console.
#[derive(Parser, Debug)]
#[command(
    name = "pc",
    about = "Insurance product catalog console",
    long_about = "Manage products, coverages, forms, pricing steps, state availability and business rules from the command line.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Directory to search for .catalog from (default: current directory).
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Assume yes for confirmations (same as --force on deletes).
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a .catalog directory and database here.
    Init(InitArgs),

    /// Manage products.
    Product(ProductArgs),

    /// Manage a product's coverages.
    Coverage(CoverageArgs),

    /// Manage forms.
    Form(FormArgs),

    /// Manage a product's pricing steps.
    Step(StepArgs),

    /// Evaluate a product's pricing chain.
    Price(PriceArgs),

    /// Manage the rating table dimensions of a factor step.
    Table(TableArgs),

    /// Manage the states a product is available in.
    States(StatesArgs),

    /// Manage business rules.
    Rule(RuleArgs),

    /// Fuzzy search across products, coverages, forms and steps.
    Search(SearchArgs),

    /// Export products, coverages and forms as a JSONL workbook.
    Export(ExportArgs),

    /// Import a JSONL or .xlsx workbook.
    Import(ImportArgs),

    /// Manage configuration.
    Config(ConfigArgs),

    /// Generate shell completions.
    Completion(CompletionArgs),

    /// Print version information.
    Version,
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

/// Arguments for `pc init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Re-initialize even if a database already exists.
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct ProductArgs {
    #[command(subcommand)]
    pub command: ProductCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProductCommands {
    /// Create a product.
    #[command(alias = "new")]
    Create(ProductCreateArgs),
    /// List products.
    List(ListArgs),
    /// Show a product with its coverages and pricing total.
    Show(IdArgs),
    /// Update product fields.
    Update(ProductUpdateArgs),
    /// Delete a product.
    Delete(ProductDeleteArgs),
    /// Upload the product's base form PDF.
    Upload(UploadArgs),
    /// Summarize the product's form PDF with the configured model.
    Summarize(IdArgs),
}

/// Arguments for `pc product create`.
#[derive(Args, Debug)]
pub struct ProductCreateArgs {
    /// Product name.
    pub name: String,

    /// Base form number.
    #[arg(long = "form-number")]
    pub form_number: String,

    /// Available states (comma-separated codes).
    #[arg(long, value_delimiter = ',')]
    pub states: Vec<String>,
}

/// Arguments for `pc product update`.
#[derive(Args, Debug)]
pub struct ProductUpdateArgs {
    /// Product ID.
    pub id: String,

    /// New name.
    #[arg(long)]
    pub name: Option<String>,

    /// New base form number.
    #[arg(long = "form-number")]
    pub form_number: Option<String>,
}

/// Arguments for `pc product delete`.
#[derive(Args, Debug)]
pub struct ProductDeleteArgs {
    /// Product ID.
    pub id: String,

    /// Also delete the product's coverages, steps and dimensions.
    #[arg(long)]
    pub recursive: bool,

    /// Confirm deletion.
    #[arg(short = 'f', long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Coverages
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct CoverageArgs {
    #[command(subcommand)]
    pub command: CoverageCommands,
}

#[derive(Subcommand, Debug)]
pub enum CoverageCommands {
    /// Add a coverage to a product.
    #[command(alias = "new")]
    Create(CoverageCreateArgs),
    /// List a product's coverages.
    List(ProductListArgs),
    /// Show a coverage.
    Show(ChildArgs),
    /// Update coverage fields.
    Update(CoverageUpdateArgs),
    /// Delete a coverage.
    Delete(ChildDeleteArgs),
    /// Replace the coverage's limits.
    Limits(AmountsArgs),
    /// Replace the coverage's deductibles.
    Deductibles(AmountsArgs),
    /// Show the form linked to a coverage.
    Form(ChildArgs),
}

/// Arguments for `pc coverage create`.
#[derive(Args, Debug)]
pub struct CoverageCreateArgs {
    /// Product ID.
    pub product: String,

    /// Coverage name.
    pub name: String,

    /// Form number of the coverage form.
    #[arg(long = "form-number")]
    pub form_number: String,

    /// Form edition date.
    #[arg(long)]
    pub edition: Option<String>,

    /// Description.
    #[arg(short = 'd', long)]
    pub description: Option<String>,

    /// Limits (comma-separated amounts).
    #[arg(long, value_delimiter = ',')]
    pub limits: Vec<String>,

    /// Deductibles (comma-separated amounts).
    #[arg(long, value_delimiter = ',')]
    pub deductibles: Vec<String>,
}

/// Arguments for `pc coverage update`.
#[derive(Args, Debug)]
pub struct CoverageUpdateArgs {
    /// Product ID.
    pub product: String,

    /// Coverage ID.
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(short = 'd', long)]
    pub description: Option<String>,

    #[arg(long = "form-number")]
    pub form_number: Option<String>,

    #[arg(long)]
    pub edition: Option<String>,
}

/// Arguments for `pc coverage limits` and `pc coverage deductibles`.
#[derive(Args, Debug)]
pub struct AmountsArgs {
    /// Product ID.
    pub product: String,

    /// Coverage ID.
    pub id: String,

    /// Amounts; anything but digits is stripped.
    pub amounts: Vec<String>,
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct FormArgs {
    #[command(subcommand)]
    pub command: FormCommands,
}

#[derive(Subcommand, Debug)]
pub enum FormCommands {
    /// Create a form.
    #[command(alias = "new")]
    Create(FormCreateArgs),
    /// List forms.
    List(ListArgs),
    /// Show a form.
    Show(IdArgs),
    /// Update form fields.
    Update(FormUpdateArgs),
    /// Delete a form.
    Delete(DeleteArgs),
    /// Upload the form's PDF.
    Upload(UploadArgs),
    /// Summarize the form's PDF with the configured model.
    Summarize(IdArgs),
}

/// Arguments for `pc form create`.
#[derive(Args, Debug)]
pub struct FormCreateArgs {
    /// Form name.
    pub name: String,

    /// Form number.
    #[arg(long)]
    pub number: String,

    /// Effective date (e.g. 10/12).
    #[arg(long)]
    pub effective: String,

    /// Edition date.
    #[arg(long)]
    pub edition: Option<String>,

    /// Form type (Proprietary, ISO, NAICS, Other).
    #[arg(short = 't', long = "type", default_value = "Proprietary")]
    pub form_type: String,

    /// Category (Base Coverage Form, Endorsement, Exclusion, Dec/Quote Letter, Notice, Other).
    #[arg(long, default_value = "Base Coverage Form")]
    pub category: String,

    /// Product the form belongs to.
    #[arg(long)]
    pub product: Option<String>,
}

/// Arguments for `pc form update`.
#[derive(Args, Debug)]
pub struct FormUpdateArgs {
    /// Form ID.
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub number: Option<String>,

    #[arg(long)]
    pub effective: Option<String>,

    #[arg(long)]
    pub edition: Option<String>,

    #[arg(short = 't', long = "type")]
    pub form_type: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Product the form belongs to (empty to unlink).
    #[arg(long)]
    pub product: Option<String>,
}

// ---------------------------------------------------------------------------
// Steps and pricing
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct StepArgs {
    #[command(subcommand)]
    pub command: StepCommands,
}

#[derive(Subcommand, Debug)]
pub enum StepCommands {
    /// Append a factor step.
    Factor(StepFactorArgs),
    /// Append an operand step.
    Operand(StepOperandArgs),
    /// List the chain, dimming steps outside the filters.
    List(StepListArgs),
    /// Show a step.
    Show(ChildArgs),
    /// Update step fields.
    Update(StepUpdateArgs),
    /// Delete a step and its dimensions, then close the gap.
    Delete(ChildDeleteArgs),
    /// Move a step to a new position.
    Move(StepMoveArgs),
}

/// Factor fields shared by `pc step factor` and `pc step update`.
#[derive(Args, Debug, Default)]
pub struct FactorFields {
    /// Coverage the factor applies to.
    #[arg(long)]
    pub coverage: Option<String>,

    /// Factor value.
    #[arg(long, allow_hyphen_values = true)]
    pub value: Option<String>,

    /// Factor type (User Input, Table, Other).
    #[arg(short = 't', long = "type")]
    pub factor_type: Option<String>,

    /// Rating table name.
    #[arg(long)]
    pub table: Option<String>,

    /// Rounding (none, Whole Number, 1 Decimal, 2 Decimals, Other).
    #[arg(long)]
    pub rounding: Option<String>,

    /// Rules text.
    #[arg(long)]
    pub rules: Option<String>,

    /// States the factor applies in (comma-separated codes).
    #[arg(long, value_delimiter = ',')]
    pub states: Option<Vec<String>>,

    /// Upstream step ID.
    #[arg(long)]
    pub upstream: Option<String>,

    /// Opening parenthesis shown before the step.
    #[arg(long = "paren-before")]
    pub paren_before: Option<String>,

    /// Closing parenthesis shown after the step.
    #[arg(long = "paren-after")]
    pub paren_after: Option<String>,
}

/// Arguments for `pc step factor`.
#[derive(Args, Debug)]
pub struct StepFactorArgs {
    /// Product ID.
    pub product: String,

    /// Step name.
    pub name: String,

    #[command(flatten)]
    pub fields: FactorFields,
}

/// Arguments for `pc step operand`.
#[derive(Args, Debug)]
pub struct StepOperandArgs {
    /// Product ID.
    pub product: String,

    /// Operator: + - * / =
    #[arg(allow_hyphen_values = true)]
    pub operand: String,
}

/// Arguments for `pc step list`.
#[derive(Args, Debug)]
pub struct StepListArgs {
    /// Product ID.
    pub product: String,

    /// Only highlight factors for these coverages.
    #[arg(long = "coverage")]
    pub coverages: Vec<String>,

    /// Only highlight factors applying in these states.
    #[arg(long = "state", value_delimiter = ',')]
    pub states: Vec<String>,

    /// Substring filter on step names.
    #[arg(short = 's', long)]
    pub search: Option<String>,
}

/// Arguments for `pc step update`.
#[derive(Args, Debug)]
pub struct StepUpdateArgs {
    /// Product ID.
    pub product: String,

    /// Step ID.
    pub id: String,

    /// New step name.
    #[arg(long)]
    pub name: Option<String>,

    /// New operator (operand steps only).
    #[arg(long, allow_hyphen_values = true)]
    pub operand: Option<String>,

    #[command(flatten)]
    pub fields: FactorFields,
}

/// Arguments for `pc step move`.
#[derive(Args, Debug)]
pub struct StepMoveArgs {
    /// Product ID.
    pub product: String,

    /// Step ID.
    pub id: String,

    /// New zero-based position.
    pub position: usize,
}

/// Arguments for `pc price`.
#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Product ID.
    pub product: String,

    /// Show the running total after every step.
    #[arg(long)]
    pub trace: bool,
}

// ---------------------------------------------------------------------------
// Rating tables
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct TableArgs {
    #[command(subcommand)]
    pub command: TableCommands,
}

#[derive(Subcommand, Debug)]
pub enum TableCommands {
    /// Show the table grid and its dimensions.
    Show(ChildArgs),
    /// Add a dimension.
    Add(DimensionAddArgs),
    /// Update a dimension.
    Update(DimensionUpdateArgs),
    /// Delete a dimension.
    Delete(DimensionDeleteArgs),
}

/// Arguments for `pc table add`.
#[derive(Args, Debug)]
pub struct DimensionAddArgs {
    /// Product ID.
    pub product: String,

    /// Step ID.
    pub step: String,

    /// Dimension name.
    pub name: String,

    /// Comma-separated values.
    #[arg(long)]
    pub values: String,

    /// Technical code.
    #[arg(long)]
    pub code: String,

    /// Axis: Row or Column.
    #[arg(short = 't', long = "type", default_value = "Row")]
    pub dim_type: String,
}

/// Arguments for `pc table update`.
#[derive(Args, Debug)]
pub struct DimensionUpdateArgs {
    /// Product ID.
    pub product: String,

    /// Step ID.
    pub step: String,

    /// Dimension ID.
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub values: Option<String>,

    #[arg(long)]
    pub code: Option<String>,

    #[arg(short = 't', long = "type")]
    pub dim_type: Option<String>,
}

/// Arguments for `pc table delete`.
#[derive(Args, Debug)]
pub struct DimensionDeleteArgs {
    /// Product ID.
    pub product: String,

    /// Step ID.
    pub step: String,

    /// Dimension ID.
    pub id: String,

    /// Confirm deletion.
    #[arg(short = 'f', long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct StatesArgs {
    #[command(subcommand)]
    pub command: StatesCommands,
}

#[derive(Subcommand, Debug)]
pub enum StatesCommands {
    /// Show the state map.
    List(StatesListArgs),
    /// Select states.
    Add(StateCodesArgs),
    /// Deselect states.
    Remove(StateCodesArgs),
    /// Flip states.
    Toggle(StateCodesArgs),
    /// Select all 50 states.
    All(ProductIdArgs),
    /// Deselect every state.
    Clear(ProductIdArgs),
}

/// Arguments for `pc states list`.
#[derive(Args, Debug)]
pub struct StatesListArgs {
    /// Product ID.
    pub product: String,

    /// Substring filter on selected state codes.
    #[arg(short = 's', long)]
    pub search: Option<String>,
}

/// Arguments for `pc states add/remove/toggle`.
#[derive(Args, Debug)]
pub struct StateCodesArgs {
    /// Product ID.
    pub product: String,

    /// State codes.
    #[arg(required = true, value_delimiter = ',')]
    pub codes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct RuleArgs {
    #[command(subcommand)]
    pub command: RuleCommands,
}

#[derive(Subcommand, Debug)]
pub enum RuleCommands {
    /// Create a rule.
    #[command(alias = "new")]
    Create(RuleCreateArgs),
    /// List rules.
    List(ListArgs),
    /// Show a rule.
    Show(IdArgs),
    /// Update rule fields.
    Update(RuleUpdateArgs),
    /// Delete a rule.
    Delete(DeleteArgs),
}

/// Arguments for `pc rule create`.
#[derive(Args, Debug)]
pub struct RuleCreateArgs {
    /// Rule name.
    pub name: String,

    /// IF clause.
    #[arg(long)]
    pub condition: String,

    /// THEN clause.
    #[arg(long)]
    pub outcome: String,

    /// Rule code.
    #[arg(long = "code")]
    pub rule_id: Option<String>,

    /// Source reference.
    #[arg(long)]
    pub reference: Option<String>,

    /// Mark as proprietary.
    #[arg(long)]
    pub proprietary: bool,

    /// Linked product ID.
    #[arg(long)]
    pub product: Option<String>,

    /// Linked coverage ID.
    #[arg(long)]
    pub coverage: Option<String>,
}

/// Arguments for `pc rule update`.
#[derive(Args, Debug)]
pub struct RuleUpdateArgs {
    /// Rule ID.
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub condition: Option<String>,

    #[arg(long)]
    pub outcome: Option<String>,

    #[arg(long = "code")]
    pub rule_id: Option<String>,

    #[arg(long)]
    pub reference: Option<String>,

    #[arg(long)]
    pub proprietary: Option<bool>,

    #[arg(long)]
    pub product: Option<String>,

    #[arg(long)]
    pub coverage: Option<String>,
}

// ---------------------------------------------------------------------------
// Search, export, import
// ---------------------------------------------------------------------------

/// Arguments for `pc search`.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search text.
    pub query: String,

    /// Maximum number of results.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// Arguments for `pc export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file (default: stdout).
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `pc import`.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Workbook to import (.jsonl or .xlsx).
    pub file: PathBuf,

    /// Show what would be written without writing.
    #[arg(long)]
    pub dry_run: bool,
}

// ---------------------------------------------------------------------------
// Config and completion
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set a configuration value.
    Set(ConfigSetArgs),
    /// Get a configuration value.
    Get(ConfigGetArgs),
    /// List all effective configuration values.
    List,
}

/// Arguments for `pc config set`.
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Dotted key, e.g. ai.model.
    pub key: String,
    /// Value.
    pub value: String,
}

/// Arguments for `pc config get`.
#[derive(Args, Debug)]
pub struct ConfigGetArgs {
    /// Dotted key, e.g. search.threshold.
    pub key: String,
}

#[derive(Args, Debug)]
pub struct CompletionArgs {
    #[command(subcommand)]
    pub command: CompletionCommands,
}

#[derive(Subcommand, Debug)]
pub enum CompletionCommands {
    /// Generate Bash completions.
    Bash,
    /// Generate Zsh completions.
    Zsh,
    /// Generate Fish completions.
    Fish,
    /// Generate PowerShell completions.
    Powershell,
}

// ---------------------------------------------------------------------------
// Shared argument shapes
// ---------------------------------------------------------------------------

/// A single top-level record.
#[derive(Args, Debug)]
pub struct IdArgs {
    /// Record ID.
    pub id: String,
}

/// A product, by ID.
#[derive(Args, Debug)]
pub struct ProductIdArgs {
    /// Product ID.
    pub product: String,
}

/// A record under a product.
#[derive(Args, Debug)]
pub struct ChildArgs {
    /// Product ID.
    pub product: String,

    /// Record ID.
    pub id: String,
}

/// Substring-filtered listing of a top-level collection.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive substring filter.
    #[arg(short = 's', long)]
    pub search: Option<String>,
}

/// Substring-filtered listing under a product.
#[derive(Args, Debug)]
pub struct ProductListArgs {
    /// Product ID.
    pub product: String,

    /// Case-insensitive substring filter.
    #[arg(short = 's', long)]
    pub search: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Record ID.
    pub id: String,

    /// Confirm deletion.
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ChildDeleteArgs {
    /// Product ID.
    pub product: String,

    /// Record ID.
    pub id: String,

    /// Confirm deletion.
    #[arg(short = 'f', long)]
    pub force: bool,
}

/// Arguments for the upload subcommands.
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Record ID.
    pub id: String,

    /// PDF file to upload.
    pub file: PathBuf,
}
