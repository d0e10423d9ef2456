//! `pc form` -- form records, PDF upload and summarization.

use anyhow::{Context, Result};

use catalog_core::document::FORMS;
use catalog_core::enums::{FormCategory, FormType};
use catalog_core::filter::filter_by_query;
use catalog_core::form::Form;
use catalog_storage::DocumentStoreExt;
use catalog_storage::blob::upload_form_file;
use catalog_storage::catalog::{insert_record, require_product, update_record};

use crate::cli::{
    DeleteArgs, FormArgs, FormCommands, FormCreateArgs, FormUpdateArgs, IdArgs, ListArgs,
    UploadArgs,
};
use crate::commands::summarize::{print_summary, summarize_pdf};
use crate::commands::{confirm_delete, non_empty, parse_label};
use crate::context::RuntimeContext;
use crate::output::{FORM_HEADERS, format_form_detail, form_row, output_json, output_table};

/// Execute the `pc form` command.
pub fn run(ctx: &RuntimeContext, args: &FormArgs) -> Result<()> {
    match &args.command {
        FormCommands::Create(a) => create(ctx, a),
        FormCommands::List(a) => list(ctx, a),
        FormCommands::Show(a) => show(ctx, a),
        FormCommands::Update(a) => update(ctx, a),
        FormCommands::Delete(a) => delete(ctx, a),
        FormCommands::Upload(a) => upload(ctx, a),
        FormCommands::Summarize(a) => summarize(ctx, a),
    }
}

fn parse_type(raw: &str) -> Result<FormType> {
    parse_label(raw, FormType::LABELS, FormType::parse_known)
}

fn parse_category(raw: &str) -> Result<FormCategory> {
    parse_label(raw, FormCategory::LABELS, FormCategory::parse_known)
}

fn create(ctx: &RuntimeContext, args: &FormCreateArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let mut form = Form::new(args.name.trim(), args.number.trim(), args.effective.trim());
    form.form_edition_date = args.edition.as_deref().and_then(non_empty).unwrap_or_default();
    form.form_type = parse_type(&args.form_type)?;
    form.category = parse_category(&args.category)?;
    if let Some(product_id) = args.product.as_deref().and_then(non_empty) {
        require_product(&catalog.store, &product_id)?;
        form.product_id = Some(product_id);
    }

    let id = insert_record(&catalog.store, FORMS, &mut form).context("failed to create form")?;

    if ctx.json {
        output_json(&form);
    } else if ctx.quiet {
        println!("{id}");
    } else {
        println!("Created form: {id}");
        println!("  Number: {}", form.label());
        println!("  Name: {}", form.form_name);
    }
    Ok(())
}

fn list(ctx: &RuntimeContext, args: &ListArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let forms: Vec<Form> = catalog.store.list(FORMS).context("failed to list forms")?;
    let forms = filter_by_query(&forms, args.search.as_deref());

    if ctx.json {
        output_json(&forms);
    } else if forms.is_empty() {
        if !ctx.quiet {
            println!("No forms found");
        }
    } else {
        let rows: Vec<Vec<String>> = forms.iter().map(form_row).collect();
        output_table(FORM_HEADERS, &rows);
    }
    Ok(())
}

fn show(ctx: &RuntimeContext, args: &IdArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let form: Form = catalog.store.get(FORMS, &args.id)?;
    if ctx.json {
        output_json(&form);
    } else {
        println!("{}", format_form_detail(&form));
    }
    Ok(())
}

fn update(ctx: &RuntimeContext, args: &FormUpdateArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let mut form: Form = catalog.store.get(FORMS, &args.id)?;
    if let Some(name) = &args.name {
        form.form_name = name.trim().to_string();
    }
    if let Some(number) = &args.number {
        form.form_number = number.trim().to_string();
    }
    if let Some(effective) = &args.effective {
        form.effective_date = effective.trim().to_string();
    }
    if let Some(edition) = &args.edition {
        form.form_edition_date = edition.trim().to_string();
    }
    if let Some(raw) = &args.form_type {
        form.form_type = parse_type(raw)?;
    }
    if let Some(raw) = &args.category {
        form.category = parse_category(raw)?;
    }
    if let Some(raw) = &args.product {
        form.product_id = non_empty(raw);
        if let Some(product_id) = &form.product_id {
            require_product(&catalog.store, product_id)?;
        }
    }
    update_record(&catalog.store, FORMS, &form)
        .with_context(|| format!("failed to update form {}", form.id))?;

    if ctx.json {
        output_json(&form);
    } else if !ctx.quiet {
        println!("Updated form: {}", form.id);
    }
    Ok(())
}

fn delete(ctx: &RuntimeContext, args: &DeleteArgs) -> Result<()> {
    confirm_delete(ctx, args.force, &format!("form {}", args.id))?;
    let catalog = ctx.open()?;
    catalog
        .store
        .remove::<Form>(FORMS, &args.id)
        .with_context(|| format!("failed to delete form {}", args.id))?;

    if ctx.json {
        output_json(&serde_json::json!({ "deleted": args.id }));
    } else if !ctx.quiet {
        println!("Deleted {}", args.id);
    }
    Ok(())
}

fn upload(ctx: &RuntimeContext, args: &UploadArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let mut form: Form = catalog.store.get(FORMS, &args.id)?;
    let (path, url) = upload_form_file(&catalog.blobs, &args.file)
        .with_context(|| format!("failed to upload {}", args.file.display()))?;
    form.file_path = Some(path);
    form.download_url = Some(url.clone());
    update_record(&catalog.store, FORMS, &form)?;

    if ctx.json {
        output_json(&form);
    } else if !ctx.quiet {
        println!("Uploaded {} for form {}", args.file.display(), form.id);
        println!("  URL: {url}");
    }
    Ok(())
}

fn summarize(ctx: &RuntimeContext, args: &IdArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let form: Form = catalog.store.get(FORMS, &args.id)?;
    let summary = summarize_pdf(&catalog, form.download_url.as_deref())?;
    print_summary(ctx, &summary);
    Ok(())
}
