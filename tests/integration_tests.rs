mod integration {
    mod classify_tests;
    mod report_tests;
    mod scan_tests;
}
