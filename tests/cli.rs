use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MONTHS: &str = "Janeiro,Fevereiro,Março,Abril,Maio,Junho,Julho,Agosto,Setembro,Outubro,Novembro,Dezembro";

fn seed(dir: &Path) {
    fs::write(
        dir.join("contasapagar.csv"),
        "Valor,Pagto,Categoria,Setor Cons.\n\
         \"1.000,00\",05/01/2024,4101 Energia,Administrativo\n\
         300,10/01/2024,Comissões,Comercial\n\
         200,15/01/2024,Tarifas Bancárias,Financeiro\n\
         100,20/01/2024,DAS Simples Nacional,Fiscal\n",
    )
    .unwrap();
    fs::write(
        dir.join("contasareceber.csv"),
        "Valor;Pagto.;Categoria\n5.000,00;10/01/2024;Venda\n-100,00;12/01/2024;Desconto\n",
    )
    .unwrap();
    fs::write(
        dir.join("classificacao_contas.csv"),
        "Conta,Grupo,Classificação\n\
         Energia Elétrica,despesas administrativas,fixo\n\
         Comissões,despesas comerciais,variável\n\
         Tarifas Bancárias,despesas financeiras,fixo\n\
         DAS Simples Nacional,imposto,fixo\n",
    )
    .unwrap();
    fs::write(
        dir.join("classificacao_mapa.csv"),
        "contasantigas,contasnovas\nEnergia,Energia Elétrica\n",
    )
    .unwrap();
    fs::write(
        dir.join("faturamento.csv"),
        format!("Cliente,Vendedor,{MONTHS}\nACME,Ana,1500,0,0,0,0,0,0,0,0,0,0,0\nBeta,Bruno,0,700,0,0,0,0,0,0,0,0,0,0\n"),
    )
    .unwrap();
}

/// A temp HOME (so no real settings.json leaks in) and a seeded data dir.
fn setup() -> (TempDir, TempDir) {
    let home = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    seed(data.path());
    (home, data)
}

fn dre(home: &TempDir, data: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dre").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data.path());
    cmd
}

#[test]
fn test_dashboard_annual() {
    let (home, data) = setup();
    dre(&home, &data)
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboard Geral (Anual)"))
        .stdout(predicate::str::contains("R$ 5.000,00"))
        // 4900 net revenue minus 300 variable, 1000 fixed, 200 financial and 200 taxes
        .stdout(predicate::str::contains("R$ 3.200,00"))
        .stdout(predicate::str::contains("Administrativo"));
}

#[test]
fn test_dashboard_empty_month() {
    let (home, data) = setup();
    dre(&home, &data)
        .args(["dashboard", "--month", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(Julho)"))
        .stdout(predicate::str::contains("Maiores Despesas").not());
}

#[test]
fn test_dashboard_rejects_month_13() {
    let (home, data) = setup();
    dre(&home, &data)
        .args(["dashboard", "--month", "13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Invalid month: 13"));
}

#[test]
fn test_billing_month() {
    let (home, data) = setup();
    dre(&home, &data)
        .args(["billing", "--month", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Análise de Faturamento (Janeiro)"))
        .stdout(predicate::str::contains("Ana (R$ 1.500,00)"))
        .stdout(predicate::str::contains("Bruno").not());
}

#[test]
fn test_billing_without_file_fails() {
    let (home, data) = setup();
    fs::remove_file(data.path().join("faturamento.csv")).unwrap();
    dre(&home, &data)
        .arg("billing")
        .assert()
        .failure()
        .stderr(predicate::str::contains("billing file not found"));
}

#[test]
fn test_quarterly_focus_month_bounds() {
    let (home, data) = setup();
    dre(&home, &data)
        .args(["quarterly", "--month", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid month: 1"));
    dre(&home, &data)
        .args(["quarterly", "--month", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DRE Trimestral (foco: Fevereiro)"))
        .stdout(predicate::str::contains("Janeiro"))
        .stdout(predicate::str::contains("Março"));
}

#[test]
fn test_statement_has_total_row() {
    let (home, data) = setup();
    dre(&home, &data)
        .arg("statement")
        .assert()
        .success()
        .stdout(predicate::str::contains("DRE Completo"))
        .stdout(predicate::str::contains("Dezembro"))
        .stdout(predicate::str::contains("Total"));
}

#[test]
fn test_executive_report() {
    let (home, data) = setup();
    dre(&home, &data)
        .arg("executive")
        .assert()
        .success()
        .stdout(predicate::str::contains("Relatório Executivo"))
        .stdout(predicate::str::contains("Principais Pontos"))
        .stdout(predicate::str::contains("lucro"));
}

#[test]
fn test_view_by_page_name() {
    let (home, data) = setup();
    dre(&home, &data)
        .args(["view", "dre completo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DRE Completo"));
    dre(&home, &data)
        .args(["view", "Login"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown page: Login"));
}

#[test]
fn test_view_home_lists_pages() {
    let (home, data) = setup();
    dre(&home, &data)
        .args(["view", "Início"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Início\n"))
        .stdout(predicate::str::contains("Relatório Executivo"));
}

#[test]
fn test_missing_column_is_reported() {
    let (home, data) = setup();
    fs::write(
        data.path().join("contasapagar.csv"),
        "Valor,Pagto,Categoria\n10,01/01/2024,Energia\n",
    )
    .unwrap();
    dre(&home, &data)
        .arg("dashboard")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing column 'Setor Cons.'"));
}

#[test]
fn test_init_then_dashboard_uses_settings() {
    let (home, data) = setup();
    Command::cargo_bin("dre")
        .unwrap()
        .env("HOME", home.path())
        .args(["init", "--company", "TeutoMaq", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings written to"));
    assert!(home.path().join(".config/dre/settings.json").exists());

    Command::cargo_bin("dre")
        .unwrap()
        .env("HOME", home.path())
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("TeutoMaq\n"));
}
