//! Shipped statement configuration.
//!
//! A compact catalog of US-GAAP tag variants and the income, balance sheet,
//! cash flow and segment statements of a diversified industrial filer. All of
//! it is plain data and can be replaced through the pipeline configuration.

use filings_core::axis::{BUSINESS_SEGMENTS_AXIS, CONSOLIDATION_ITEMS_AXIS};
use filings_core::AxisPriority;

use crate::catalog::{SegmentAliases, TagCatalog};
use crate::schema::{SchemaLine, StatementKind, StatementSchema};

/// Name of the income statement table.
pub const INCOME_STATEMENT: &str = "Income Statement";
/// Name of the balance sheet table.
pub const BALANCE_SHEET: &str = "Balance Sheet";
/// Name of the cash flow table.
pub const CASH_FLOW: &str = "Cash Flow";
/// Name of the operating segments table.
pub const OPERATING_SEGMENTS: &str = "Operating Segments";

const SEGMENT_CODES: &[(&str, &str)] = &[
    ("FP", "FinancialProductsMember"),
    ("MET", "MachineryEnergyTransportationMember"),
    ("EXFP", "AllOtherExcludingFinancialProductsMember"),
    ("OpSeg", "OperatingSegmentsMember"),
    ("CI", "ConstructionIndustriesMember"),
    ("RI", "ResourceIndustriesMember"),
    ("ET", "EnergyandTransportationMember"),
    ("FPS", "FinancialProductsSegmentMember"),
];

const CANDIDATES: &[(&str, &[&str])] = &[
    // Income statement
    (
        "Revenues",
        &[
            "Revenues",
            "SalesRevenueNet",
            "SalesAndRevenue",
            "SalesRevenueGoodsNet",
            "SalesRevenueServicesNet",
            "RevenueFromContractWithCustomerExcludingAssessedTax",
        ],
    ),
    (
        "CostOfRevenue",
        &["CostOfRevenue", "CostOfGoodsAndServicesSold", "CostOfGoodsSold"],
    ),
    (
        "OtherOperatingIncomeExpenseNet",
        &["OtherOperatingIncomeExpenseNet", "OtherOperatingIncomeExpense"],
    ),
    ("CostsAndExpenses", &["CostsAndExpenses", "OperatingExpenses"]),
    (
        "FinancingInterestExpense",
        &[
            "FinancingInterestExpense",
            "InterestExpense",
            "InterestAndDebtExpense",
        ],
    ),
    (
        "InterestExpenseNonoperating",
        &["InterestExpenseNonoperating", "InterestAndDebtExpense"],
    ),
    (
        "OtherNonoperatingIncomeExpense",
        &["OtherNonoperatingIncomeExpense", "NonoperatingIncomeExpense"],
    ),
    (
        "IncomeLossFromContinuingOperationsBeforeIncomeTaxesMinorityInterestAndIncomeLossFromEquityMethodInvestments",
        &[
            "IncomeLossFromContinuingOperationsBeforeIncomeTaxesMinorityInterestAndIncomeLossFromEquityMethodInvestments",
            "IncomeLossFromContinuingOperationsBeforeIncomeTaxes",
        ],
    ),
    ("ProfitLoss", &["ProfitLoss", "NetIncomeLoss"]),
    // Balance sheet
    (
        "CashAndCashEquivalentsAtCarryingValue",
        &[
            "CashAndCashEquivalentsAtCarryingValue",
            "CashCashEquivalentsAtCarryingValue",
            "CashCashEquivalentsAndShortTermInvestments",
        ],
    ),
    (
        "AccountsReceivableNetCurrent",
        &[
            "AccountsReceivableNetCurrent",
            "AccountsReceivableNet",
            "ReceivablesNetCurrent",
        ],
    ),
    (
        "NotesAndLoansReceivableNetCurrent",
        &[
            "NotesAndLoansReceivableNetCurrent",
            "LoansAndLeasesReceivableNetCurrent",
            "FinanceReceivableCurrent",
        ],
    ),
    (
        "PrepaidExpenseAndOtherAssetsCurrent",
        &[
            "PrepaidExpenseAndOtherAssetsCurrent",
            "PrepaidExpenseCurrent",
            "OtherAssetsCurrent",
        ],
    ),
    ("InventoryNet", &["InventoryNet", "Inventories"]),
    (
        "PropertyPlantAndEquipmentNet",
        &[
            "PropertyPlantAndEquipmentNet",
            "PropertyPlantAndEquipmentAndFinanceLeaseRightOfUseAssetAfterAccumulatedDepreciationAndAmortization",
        ],
    ),
    (
        "NotesAndLoansReceivableNetNoncurrent",
        &[
            "NotesAndLoansReceivableNetNoncurrent",
            "LoansAndLeasesReceivableNetNoncurrent",
            "FinanceReceivableNoncurrent",
        ],
    ),
    (
        "NoncurrentDeferredAndRefundableIncomeTaxes",
        &[
            "NoncurrentDeferredAndRefundableIncomeTaxes",
            "DeferredTaxAssetsNetNoncurrent",
        ],
    ),
    (
        "IntangibleAssetsNetExcludingGoodwill",
        &[
            "IntangibleAssetsNetExcludingGoodwill",
            "FiniteLivedIntangibleAssetsNet",
        ],
    ),
    ("ShortTermBorrowings", &["ShortTermBorrowings", "CommercialPaper"]),
    (
        "EmployeeRelatedLiabilitiesCurrent",
        &[
            "EmployeeRelatedLiabilitiesCurrent",
            "AccruedCompensationCurrent",
        ],
    ),
    (
        "ContractWithCustomerLiabilityCurrent",
        &[
            "ContractWithCustomerLiabilityCurrent",
            "DeferredRevenueCurrent",
        ],
    ),
    (
        "LongTermDebtAndCapitalLeaseObligationsCurrent",
        &[
            "LongTermDebtAndCapitalLeaseObligationsCurrent",
            "LongTermDebtCurrent",
        ],
    ),
    (
        "LongTermDebtAndCapitalLeaseObligations",
        &[
            "LongTermDebtAndCapitalLeaseObligations",
            "LongTermDebtNoncurrent",
            "LongTermDebt",
        ],
    ),
    (
        "CommonStocksIncludingAdditionalPaidInCapital",
        &[
            "CommonStocksIncludingAdditionalPaidInCapital",
            "CommonStockValue",
        ],
    ),
    (
        "RetainedEarningsAccumulatedDeficit",
        &["RetainedEarningsAccumulatedDeficit", "RetainedEarnings"],
    ),
    (
        "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
        &[
            "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
            "StockholdersEquity",
        ],
    ),
    // Cash flow
    (
        "DepreciationDepletionAndAmortization",
        &[
            "DepreciationDepletionAndAmortization",
            "DepreciationAndAmortization",
            "DepreciationAmortizationAndAccretionNet",
        ],
    ),
    (
        "OtherNoncashIncomeExpense",
        &["OtherNoncashIncomeExpense", "OtherNoncashOperatingActivities"],
    ),
    (
        "IncreaseDecreaseInReceivables",
        &[
            "IncreaseDecreaseInReceivables",
            "IncreaseDecreaseInAccountsReceivable",
            "IncreaseDecreaseInAccountsAndNotesReceivable",
        ],
    ),
    (
        "IncreaseDecreaseInInventories",
        &["IncreaseDecreaseInInventories", "IncreaseDecreaseInInventory"],
    ),
    (
        "IncreaseDecreaseInContractWithCustomerLiability",
        &[
            "IncreaseDecreaseInContractWithCustomerLiability",
            "IncreaseDecreaseInDeferredRevenue",
        ],
    ),
    (
        "NetCashProvidedByUsedInOperatingActivities",
        &[
            "NetCashProvidedByUsedInOperatingActivities",
            "NetCashProvidedByUsedInOperatingActivitiesContinuingOperations",
        ],
    ),
    (
        "PaymentsToAcquirePropertyPlantAndEquipment",
        &["PaymentsToAcquirePropertyPlantAndEquipment", "CapitalExpenditures"],
    ),
    (
        "ProceedsFromSaleOfPropertyPlantAndEquipment",
        &[
            "ProceedsFromSaleOfPropertyPlantAndEquipment",
            "ProceedsFromDisposalsOfLeasedAssetsAndPropertyPlantAndEquipment",
        ],
    ),
    (
        "PaymentsToAcquireBusinessesNetOfCashAcquired",
        &[
            "PaymentsToAcquireBusinessesNetOfCashAcquired",
            "PaymentsForBusinessCombinationsNetOfCashAcquired",
        ],
    ),
    (
        "PaymentsOfDividendsCommonStock",
        &["PaymentsOfDividendsCommonStock", "PaymentsOfDividends"],
    ),
    (
        "PaymentsForRepurchaseOfCommonStock",
        &["PaymentsForRepurchaseOfCommonStock", "PaymentsForRepurchaseOfEquity"],
    ),
    (
        "ProceedsFromDebtMaturingInMoreThanThreeMonths",
        &[
            "ProceedsFromDebtMaturingInMoreThanThreeMonths",
            "ProceedsFromIssuanceOfLongTermDebt",
        ],
    ),
    (
        "RepaymentsOfDebtMaturingInMoreThanThreeMonths",
        &[
            "RepaymentsOfDebtMaturingInMoreThanThreeMonths",
            "RepaymentsOfLongTermDebt",
        ],
    ),
    (
        "EffectOfExchangeRateOnCashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents",
        &[
            "EffectOfExchangeRateOnCashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents",
            "EffectOfExchangeRateOnCashAndCashEquivalents",
        ],
    ),
];

/// Candidate tag lists for the shipped statements.
#[must_use]
pub fn default_catalog() -> TagCatalog {
    CANDIDATES
        .iter()
        .fold(TagCatalog::new(), |catalog, (concept, candidates)| {
            catalog.with_candidates(*concept, candidates.iter().copied())
        })
}

/// Segment codes used in the `concept_CODE` key form.
#[must_use]
pub fn default_aliases() -> SegmentAliases {
    SEGMENT_CODES
        .iter()
        .fold(SegmentAliases::new(), |aliases, (code, member)| {
            aliases.with_alias(*code, *member)
        })
}

/// Income statement, balance sheet, cash flow and segment statements.
#[must_use]
pub fn default_schemas() -> Vec<StatementSchema> {
    let aliases = default_aliases();
    let mut schemas = vec![
        income_statement(&aliases),
        balance_sheet(&aliases),
        cash_flow(&aliases),
        operating_segments(&aliases),
    ];
    for (name, code) in [
        ("Construction Industries", "CI"),
        ("Resource Industries", "RI"),
        ("Energy & Transportation", "ET"),
        ("Financial Products", "FPS"),
    ] {
        schemas.push(business_segment(name, code, &aliases));
    }
    schemas
}

fn keyed(aliases: &SegmentAliases, rows: &[(&str, &str)]) -> Vec<SchemaLine> {
    rows.iter()
        .map(|(key, label)| SchemaLine::from_key(key, *label, aliases))
        .collect()
}

fn income_statement(aliases: &SegmentAliases) -> StatementSchema {
    StatementSchema::new(INCOME_STATEMENT, StatementKind::Income)
        .with_line(SchemaLine::spacer("Sales and revenues:"))
        .with_lines(keyed(
            aliases,
            &[
                ("Revenues_MET", "Sales of Machinery, Energy & Transportation"),
                ("Revenues_FP", "Revenues of Financial Products"),
            ],
        ))
        .with_line(SchemaLine::item("Revenues", "Total sales and revenues"))
        .with_line(SchemaLine::spacer("Operating costs:"))
        .with_lines(keyed(
            aliases,
            &[
                ("CostOfRevenue", "Cost of goods sold"),
                ("SellingGeneralAndAdministrativeExpense", "SG&A expenses"),
                ("ResearchAndDevelopmentExpense", "R&D expenses"),
                (
                    "FinancingInterestExpense_FP",
                    "Interest expense of Financial Products",
                ),
                ("OtherOperatingIncomeExpenseNet", "Other operating (income) expenses"),
            ],
        ))
        .with_line(SchemaLine::item("CostsAndExpenses", "Total operating costs"))
        .with_line(SchemaLine::item("OperatingIncomeLoss", "Operating profit"))
        .with_lines(keyed(
            aliases,
            &[
                (
                    "InterestExpenseNonoperating_EXFP",
                    "Interest expense excluding Financial Products",
                ),
                ("OtherNonoperatingIncomeExpense", "Other income (expense)"),
                (
                    "IncomeLossFromContinuingOperationsBeforeIncomeTaxesMinorityInterestAndIncomeLossFromEquityMethodInvestments",
                    "Consolidated profit before taxes",
                ),
                ("IncomeTaxExpenseBenefit", "Provision (benefit) for income taxes"),
                ("ProfitOfConsolidatedCompanies", "Profit of consolidated companies"),
                (
                    "IncomeLossFromEquityMethodInvestments",
                    "Equity in profit (loss) of unconsolidated affiliated companies",
                ),
                ("ProfitLoss", "Profit of consolidated and affiliated companies"),
                (
                    "NetIncomeLossAttributableToNoncontrollingInterest",
                    "Less: profit (loss) attributable to noncontrolling interests",
                ),
                (
                    "NetIncomeLossAvailableToCommonStockholdersBasic",
                    "Profit attributable to common shareholders",
                ),
            ],
        ))
        .with_line(SchemaLine::spacer(""))
        .with_lines(keyed(
            aliases,
            &[
                ("EarningsPerShareBasic", "Profit per common share"),
                ("EarningsPerShareDiluted", "Profit per common share - diluted"),
                ("WeightedAverageNumberOfSharesOutstandingBasic", "Shares outstanding - basic"),
                (
                    "WeightedAverageNumberOfDilutedSharesOutstanding",
                    "Shares outstanding - diluted",
                ),
            ],
        ))
}

fn balance_sheet(aliases: &SegmentAliases) -> StatementSchema {
    StatementSchema::new(BALANCE_SHEET, StatementKind::BalanceSheet)
        .with_line(SchemaLine::spacer("Current assets:"))
        .with_lines(keyed(
            aliases,
            &[
                ("CashAndCashEquivalentsAtCarryingValue", "Cash and cash equivalents"),
                ("AccountsReceivableNetCurrent", "Receivables - trade and other"),
                ("NotesAndLoansReceivableNetCurrent", "Receivables - finance"),
                ("PrepaidExpenseAndOtherAssetsCurrent", "Prepaid expenses and other current assets"),
                ("InventoryNet", "Inventories"),
            ],
        ))
        .with_line(SchemaLine::item("AssetsCurrent", "Total current assets"))
        .with_lines(keyed(
            aliases,
            &[
                ("PropertyPlantAndEquipmentNet", "Property, plant and equipment - net"),
                ("AccountsReceivableNetNoncurrent", "Long-term receivables - trade and other"),
                ("NotesAndLoansReceivableNetNoncurrent", "Long-term receivables - finance"),
                (
                    "NoncurrentDeferredAndRefundableIncomeTaxes",
                    "Noncurrent deferred and refundable income taxes",
                ),
                ("IntangibleAssetsNetExcludingGoodwill", "Intangible assets"),
                ("Goodwill", "Goodwill"),
                ("OtherAssetsNoncurrent", "Other assets"),
            ],
        ))
        .with_line(SchemaLine::item("Assets", "Total assets"))
        .with_line(SchemaLine::spacer("Current liabilities:"))
        .with_lines(keyed(
            aliases,
            &[
                ("ShortTermBorrowings_FinancialProducts", "Short-term borrowings - Financial Products"),
                ("AccountsPayableCurrent", "Accounts payable"),
                ("AccruedLiabilitiesCurrent", "Accrued expenses"),
                ("EmployeeRelatedLiabilitiesCurrent", "Accrued wages, salaries and employee benefits"),
                ("ContractWithCustomerLiabilityCurrent", "Customer advances"),
                ("DividendsPayableCurrent", "Dividends payable"),
                ("OtherLiabilitiesCurrent", "Other current liabilities"),
            ],
        ))
        .with_line(SchemaLine::spacer("Long-term debt due within one year:"))
        .with_lines(keyed(
            aliases,
            &[
                (
                    "LongTermDebtAndCapitalLeaseObligationsCurrent_MET",
                    "Machinery, Energy & Transportation",
                ),
                ("LongTermDebtAndCapitalLeaseObligationsCurrent_FP", "Financial Products"),
            ],
        ))
        .with_line(SchemaLine::item("LiabilitiesCurrent", "Total current liabilities"))
        .with_line(SchemaLine::spacer("Long-term debt due after one year:"))
        .with_lines(keyed(
            aliases,
            &[
                ("LongTermDebtAndCapitalLeaseObligations_MET", "Machinery, Energy & Transportation"),
                ("LongTermDebtAndCapitalLeaseObligations_FP", "Financial Products"),
                (
                    "PensionAndOtherPostretirementAndPostemploymentBenefitPlansLiabilitiesNoncurrent",
                    "Liability for postemployment benefits",
                ),
                ("OtherLiabilitiesNoncurrent", "Other liabilities"),
            ],
        ))
        .with_line(SchemaLine::item("Liabilities", "Total liabilities"))
        .with_line(SchemaLine::spacer("Shareholders' equity:"))
        .with_lines(keyed(
            aliases,
            &[
                ("CommonStocksIncludingAdditionalPaidInCapital", "Issued shares at paid-in amount"),
                ("TreasuryStockValue", "Treasury stock at cost"),
                ("RetainedEarningsAccumulatedDeficit", "Profit employed in the business"),
                (
                    "AccumulatedOtherComprehensiveIncomeLossNetOfTax",
                    "Accumulated other comprehensive income (loss)",
                ),
                ("MinorityInterest", "Noncontrolling interests"),
            ],
        ))
        .with_line(
            SchemaLine::item(
                "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
                "Total shareholders' equity",
            )
            ,
        )
        .with_line(
            SchemaLine::item(
                "LiabilitiesAndStockholdersEquity",
                "Total liabilities and shareholders' equity",
            )
            ,
        )
}

fn cash_flow(aliases: &SegmentAliases) -> StatementSchema {
    StatementSchema::new(CASH_FLOW, StatementKind::CashFlow)
        .with_line(SchemaLine::spacer("Cash flow from operating activities:"))
        .with_lines(keyed(
            aliases,
            &[
                ("ProfitLoss", "Profit of consolidated and affiliated companies"),
                ("DepreciationDepletionAndAmortization", "Depreciation and amortization"),
                ("DeferredIncomeTaxExpenseBenefit", "Provision (benefit) for deferred income taxes"),
                ("OtherNoncashIncomeExpense", "Other"),
                ("IncreaseDecreaseInReceivables", "Receivables - trade and other"),
                ("IncreaseDecreaseInInventories", "Inventories"),
                ("IncreaseDecreaseInAccountsPayable", "Accounts payable"),
                ("IncreaseDecreaseInAccruedLiabilities", "Accrued expenses"),
                (
                    "IncreaseDecreaseInEmployeeRelatedLiabilities",
                    "Accrued wages, salaries and employee benefits",
                ),
                ("IncreaseDecreaseInContractWithCustomerLiability", "Customer advances"),
                ("IncreaseDecreaseInOtherOperatingAssets", "Other assets - net"),
                ("IncreaseDecreaseInOtherOperatingLiabilities", "Other liabilities - net"),
            ],
        ))
        .with_line(
            SchemaLine::item(
                "NetCashProvidedByUsedInOperatingActivities",
                "Net cash provided by (used for) operating activities",
            )
            .as_total(),
        )
        .with_line(SchemaLine::spacer("Cash flow from investing activities:"))
        .with_lines(keyed(
            aliases,
            &[
                (
                    "PaymentsToAcquirePropertyPlantAndEquipment",
                    "Capital expenditures - excluding equipment leased to others",
                ),
                ("PaymentsToAcquireEquipmentOnLease", "Expenditures for equipment leased to others"),
                (
                    "ProceedsFromSaleOfPropertyPlantAndEquipment",
                    "Proceeds from disposals of leased assets and property, plant and equipment",
                ),
                ("PaymentsToAcquireFinanceReceivables", "Additions to finance receivables"),
                ("ProceedsFromCollectionOfFinanceReceivables", "Collections of finance receivables"),
                ("ProceedsFromSaleOfFinanceReceivables", "Proceeds from sale of finance receivables"),
                (
                    "PaymentsToAcquireBusinessesNetOfCashAcquired",
                    "Investments and acquisitions (net of cash acquired)",
                ),
                (
                    "ProceedsFromSaleAndMaturityOfMarketableSecurities",
                    "Proceeds from maturities and sale of securities",
                ),
                ("PaymentsToAcquireMarketableSecurities", "Investments in securities"),
                ("PaymentsForProceedsFromOtherInvestingActivities", "Other - net"),
            ],
        ))
        .with_line(
            SchemaLine::item(
                "NetCashProvidedByUsedInInvestingActivities",
                "Net cash provided by (used for) investing activities",
            )
            .as_total(),
        )
        .with_line(SchemaLine::spacer("Cash flow from financing activities:"))
        .with_lines(keyed(
            aliases,
            &[
                ("PaymentsOfDividendsCommonStock", "Dividends paid"),
                ("PaymentsForRepurchaseOfCommonStock", "Payments to purchase common stock"),
                (
                    "ProceedsFromDebtMaturingInMoreThanThreeMonths_MET",
                    "Proceeds from debt issued - Machinery, Energy & Transportation",
                ),
                (
                    "ProceedsFromDebtMaturingInMoreThanThreeMonths_FP",
                    "Proceeds from debt issued - Financial Products",
                ),
                (
                    "RepaymentsOfDebtMaturingInMoreThanThreeMonths_MET",
                    "Payments on debt - Machinery, Energy & Transportation",
                ),
                (
                    "RepaymentsOfDebtMaturingInMoreThanThreeMonths_FP",
                    "Payments on debt - Financial Products",
                ),
                (
                    "ProceedsFromRepaymentsOfShortTermDebtMaturingInThreeMonthsOrLess",
                    "Short-term borrowings - net",
                ),
            ],
        ))
        .with_line(
            SchemaLine::item(
                "NetCashProvidedByUsedInFinancingActivities",
                "Net cash provided by (used for) financing activities",
            )
            .as_total(),
        )
        .with_line(SchemaLine::from_key(
            "EffectOfExchangeRateOnCashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents",
            "Effect of exchange rate changes on cash",
            aliases,
        ))
}

const SEGMENT_PROFIT: &str = "IncomeLossFromContinuingOperationsBeforeIncomeTaxesMinorityInterestAndIncomeLossFromEquityMethodInvestments";

fn operating_segments(aliases: &SegmentAliases) -> StatementSchema {
    let code = "OpSeg";
    StatementSchema::new(OPERATING_SEGMENTS, StatementKind::Segment)
        .without_q4()
        .with_axis_priority(AxisPriority::new([
            CONSOLIDATION_ITEMS_AXIS,
            BUSINESS_SEGMENTS_AXIS,
        ]))
        .with_lines(
            [
                ("Revenues", "Sales and revenues"),
                ("CostOfRevenue", "Cost of goods sold"),
                ("SellingGeneralAndAdministrativeResearchAndDevelopment", "SG&A/R&D"),
                ("SegmentReportingOtherItemAmount", "Other segment items"),
                (SEGMENT_PROFIT, "Profit"),
                ("DepreciationDepletionAndAmortization", "Depreciation and amortization"),
                (
                    "SegmentReportingInformationExpenditureForAdditionsLongLivedAssets",
                    "Capital expenditures",
                ),
            ]
            .into_iter()
            .map(|(concept, label)| {
                SchemaLine::from_key(&format!("{concept}_{code}"), label, aliases)
            }),
        )
}

fn business_segment(name: &str, code: &str, aliases: &SegmentAliases) -> StatementSchema {
    StatementSchema::new(name, StatementKind::Segment)
        .without_q4()
        .with_lines(
            [
                ("Revenues", "Sales and revenues"),
                (SEGMENT_PROFIT, "Profit"),
                ("DepreciationDepletionAndAmortization", "Depreciation and amortization"),
                (
                    "SegmentReportingInformationExpenditureForAdditionsLongLivedAssets",
                    "Capital expenditures",
                ),
            ]
            .into_iter()
            .map(|(concept, label)| {
                SchemaLine::from_key(&format!("{concept}_{code}"), label, aliases)
            }),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PeriodAxis, SegmentSelector};

    #[test]
    fn test_default_schemas_cover_statements() {
        let schemas = default_schemas();
        let names: Vec<&str> = schemas.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                INCOME_STATEMENT,
                BALANCE_SHEET,
                CASH_FLOW,
                OPERATING_SEGMENTS,
                "Construction Industries",
                "Resource Industries",
                "Energy & Transportation",
                "Financial Products",
            ]
        );
        assert_eq!(schemas[1].kind.axis(), PeriodAxis::Instant);
        assert!(schemas.iter().skip(3).all(|s| !s.include_q4));
    }

    #[test]
    fn test_segment_schemas_target_members() {
        let schemas = default_schemas();
        let ci = schemas
            .iter()
            .find(|s| s.name == "Construction Industries")
            .unwrap();
        assert!(ci.items().all(|item| item.segment
            == SegmentSelector::Member("ConstructionIndustriesMember".into())));
        let first = ci.items().next().unwrap();
        assert_eq!(first.concept, "Revenues");
    }

    #[test]
    fn test_balance_sheet_keeps_both_debt_blocks() {
        let schemas = default_schemas();
        let balance = &schemas[1];
        let met_debt = balance
            .items()
            .filter(|item| item.label == "Machinery, Energy & Transportation")
            .count();
        assert_eq!(met_debt, 2);
    }

    #[test]
    fn test_cash_flow_totals_marked() {
        let schemas = default_schemas();
        let totals: Vec<&str> = schemas[2]
            .items()
            .filter(|item| item.total)
            .map(|item| item.concept.as_str())
            .collect();
        assert_eq!(totals.len(), 3);
        assert!(totals.iter().all(|c| c.starts_with("NetCashProvidedByUsedIn")));
    }

    #[test]
    fn test_catalog_has_revenue_variants() {
        let catalog = default_catalog();
        let revenues = catalog.candidates("Revenues");
        assert_eq!(revenues[0], "Revenues");
        assert!(revenues.contains(&"RevenueFromContractWithCustomerExcludingAssessedTax"));
    }
}
